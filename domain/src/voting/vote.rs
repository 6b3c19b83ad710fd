//! Vote types
//!
//! A vote is identified by its natural key (trip, stage, item, participant).
//! Writing a vote with an existing key replaces the earlier value.

use crate::core::ids::{ItemId, ParticipantId, TripId};
use crate::trip::stage::Stage;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Like or pass on a single item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteValue {
    Like,
    Pass,
}

impl VoteValue {
    pub fn is_like(&self) -> bool {
        matches!(self, VoteValue::Like)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VoteValue::Like => "like",
            VoteValue::Pass => "pass",
        }
    }
}

impl std::fmt::Display for VoteValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for VoteValue {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "like" | "l" | "y" | "yes" | "+" => Ok(VoteValue::Like),
            "pass" | "p" | "n" | "no" | "-" => Ok(VoteValue::Pass),
            other => Err(format!("Unknown vote: {}. Valid: like, pass", other)),
        }
    }
}

/// Natural identity of a vote.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VoteKey {
    pub trip_id: TripId,
    pub stage: Stage,
    pub item_id: ItemId,
    pub participant_id: ParticipantId,
}

/// A single participant's vote on an item
///
/// # Example
///
/// ```
/// use tripvote_domain::{ItemId, ParticipantId, Stage, TripId, Vote, VoteValue};
///
/// let vote = Vote::new(
///     TripId::new("trip"),
///     Stage::Destinations,
///     ItemId::new("santorini"),
///     ParticipantId::new("ana"),
///     VoteValue::Like,
/// );
/// assert!(vote.value.is_like());
/// assert_eq!(vote.key().item_id.as_str(), "santorini");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vote {
    pub trip_id: TripId,
    pub stage: Stage,
    pub item_id: ItemId,
    pub participant_id: ParticipantId,
    pub value: VoteValue,
    pub voted_at: DateTime<Utc>,
}

impl Vote {
    pub fn new(
        trip_id: TripId,
        stage: Stage,
        item_id: ItemId,
        participant_id: ParticipantId,
        value: VoteValue,
    ) -> Self {
        Self {
            trip_id,
            stage,
            item_id,
            participant_id,
            value,
            voted_at: Utc::now(),
        }
    }

    pub fn like(trip_id: TripId, stage: Stage, item_id: ItemId, participant_id: ParticipantId) -> Self {
        Self::new(trip_id, stage, item_id, participant_id, VoteValue::Like)
    }

    pub fn pass(trip_id: TripId, stage: Stage, item_id: ItemId, participant_id: ParticipantId) -> Self {
        Self::new(trip_id, stage, item_id, participant_id, VoteValue::Pass)
    }

    pub fn key(&self) -> VoteKey {
        VoteKey {
            trip_id: self.trip_id.clone(),
            stage: self.stage,
            item_id: self.item_id.clone(),
            participant_id: self.participant_id.clone(),
        }
    }
}
