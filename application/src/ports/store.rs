//! Persistence ports
//!
//! The relational store is an external collaborator. These traits describe
//! the tables the voting core reads and writes; every mutation is an
//! idempotent upsert keyed by natural identity.

use async_trait::async_trait;
use thiserror::Error;
use tripvote_domain::{
    ItemId, Participant, ParticipantId, Stage, Trip, TripId, VotableItem, Vote,
};

/// Errors that can occur in store adapters
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Rejected by store: {0}")]
    Rejected(String),

    #[error("Stored data is corrupt: {0}")]
    Corrupt(String),
}

impl StoreError {
    pub fn trip_not_found(id: &TripId) -> Self {
        StoreError::NotFound {
            entity: "trip",
            id: id.to_string(),
        }
    }

    pub fn participant_not_found(id: &ParticipantId) -> Self {
        StoreError::NotFound {
            entity: "participant",
            id: id.to_string(),
        }
    }

    /// Transient I/O failure; retrying the same call may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::Unavailable(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

/// Trips table
#[async_trait]
pub trait TripRepository: Send + Sync {
    async fn create_trip(&self, trip: &Trip) -> Result<(), StoreError>;

    async fn get_trip(&self, id: &TripId) -> Result<Option<Trip>, StoreError>;

    /// Move the trip from `from` to `to` if it is still at `from`.
    ///
    /// Idempotent and monotonic: when the trip has already left `from` the
    /// call changes nothing. Returns the stage the trip is at afterwards.
    async fn advance_stage(&self, id: &TripId, from: Stage, to: Stage)
    -> Result<Stage, StoreError>;
}

/// Trip participants table
#[async_trait]
pub trait ParticipantRegistry: Send + Sync {
    async fn add_participant(&self, participant: &Participant) -> Result<(), StoreError>;

    /// All participants of a trip, in join order.
    async fn participants(&self, trip_id: &TripId) -> Result<Vec<Participant>, StoreError>;

    async fn get_participant(
        &self,
        trip_id: &TripId,
        id: &ParticipantId,
    ) -> Result<Option<Participant>, StoreError>;

    async fn set_stage_complete(
        &self,
        trip_id: &TripId,
        id: &ParticipantId,
        stage: Stage,
        done: bool,
    ) -> Result<(), StoreError>;
}

/// Destination, accommodation and transportation tables
#[async_trait]
pub trait ItemCatalog: Send + Sync {
    /// Replace the whole item set of one stage.
    async fn replace_items(
        &self,
        trip_id: &TripId,
        stage: Stage,
        items: &[VotableItem],
    ) -> Result<(), StoreError>;

    /// Items of a stage ordered by insertion position.
    async fn items_for_stage(
        &self,
        trip_id: &TripId,
        stage: Stage,
    ) -> Result<Vec<VotableItem>, StoreError>;

    async fn get_item(&self, trip_id: &TripId, id: &ItemId)
    -> Result<Option<VotableItem>, StoreError>;
}

/// Destination, accommodation and transportation vote tables
#[async_trait]
pub trait VoteStore: Send + Sync {
    /// Insert or overwrite by (trip, stage, item, participant).
    async fn upsert_vote(&self, vote: &Vote) -> Result<(), StoreError>;

    async fn votes_for_stage(&self, trip_id: &TripId, stage: Stage)
    -> Result<Vec<Vote>, StoreError>;

    async fn votes_by_participant(
        &self,
        trip_id: &TripId,
        stage: Stage,
        participant: &ParticipantId,
    ) -> Result<Vec<Vote>, StoreError>;

    /// Number of votes across all stages of a trip.
    async fn count_votes(&self, trip_id: &TripId) -> Result<usize, StoreError>;
}

/// Everything the voting core needs from the relational store.
pub trait TripStore: TripRepository + ParticipantRegistry + ItemCatalog + VoteStore {}

impl<T> TripStore for T where T: TripRepository + ParticipantRegistry + ItemCatalog + VoteStore {}
