//! Domain error types

use crate::core::ids::ItemId;
use crate::trip::stage::Stage;
use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Trip name cannot be empty")]
    EmptyTripName,

    #[error("Trip ends ({end}) before it starts ({start})")]
    InvalidDateRange { start: String, end: String },

    #[error("Display name cannot be empty")]
    EmptyDisplayName,

    #[error("Item {item} is not part of the {stage} item set")]
    ItemNotInStage { item: ItemId, stage: Stage },

    #[error("All {0} items already have a vote")]
    StageExhausted(Stage),

    #[error("A vote is still being submitted")]
    SubmissionInFlight,

    #[error("Voting is closed for this trip")]
    VotingClosed,

    #[error("Cannot move from {from} back to {to}")]
    StageRegression { from: Stage, to: Stage },

    #[error("{0} is not a voting stage")]
    NotAVotingStage(Stage),

    #[error("Invalid share link: {0}")]
    InvalidShareLink(String),
}

impl DomainError {
    /// Whether the caller may simply try the same action again later.
    pub fn is_transient(&self) -> bool {
        matches!(self, DomainError::SubmissionInFlight)
    }
}
