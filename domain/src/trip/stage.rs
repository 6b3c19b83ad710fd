//! Voting stages of a trip

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Stage of a trip.
///
/// Stages advance strictly forward:
///
/// ```text
/// Destinations → Accommodations → Transportation → Completed
/// ```
///
/// # Example
///
/// ```
/// use tripvote_domain::Stage;
///
/// assert_eq!(Stage::Destinations.next(), Stage::Accommodations);
/// assert_eq!(Stage::Completed.next(), Stage::Completed);
/// assert!(Stage::Transportation.is_votable());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    #[default]
    Destinations,
    Accommodations,
    Transportation,
    Completed,
}

impl Stage {
    /// The three stages participants vote in, in order.
    pub const VOTING: [Stage; 3] = [
        Stage::Destinations,
        Stage::Accommodations,
        Stage::Transportation,
    ];

    /// The stage that follows this one. `Completed` is absorbing.
    pub fn next(self) -> Stage {
        match self {
            Stage::Destinations => Stage::Accommodations,
            Stage::Accommodations => Stage::Transportation,
            Stage::Transportation | Stage::Completed => Stage::Completed,
        }
    }

    /// Whether participants cast votes in this stage.
    pub fn is_votable(self) -> bool {
        !matches!(self, Stage::Completed)
    }

    /// Returns `Ok(self)` for voting stages.
    pub fn require_votable(self) -> Result<Stage, DomainError> {
        if self.is_votable() {
            Ok(self)
        } else {
            Err(DomainError::NotAVotingStage(self))
        }
    }

    /// 1-based position among the voting stages, `None` for `Completed`.
    pub fn ordinal(self) -> Option<usize> {
        Self::VOTING.iter().position(|s| *s == self).map(|i| i + 1)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Destinations => "destinations",
            Stage::Accommodations => "accommodations",
            Stage::Transportation => "transportation",
            Stage::Completed => "completed",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Stage::Destinations => "Destinations",
            Stage::Accommodations => "Accommodations",
            Stage::Transportation => "Transportation",
            Stage::Completed => "Completed",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Stage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "destinations" | "destination" => Ok(Stage::Destinations),
            "accommodations" | "accommodation" => Ok(Stage::Accommodations),
            "transportation" | "transport" => Ok(Stage::Transportation),
            "completed" | "complete" => Ok(Stage::Completed),
            other => Err(format!(
                "Unknown stage: {}. Valid: destinations, accommodations, transportation, completed",
                other
            )),
        }
    }
}
