//! Domain layer for tripvote
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Stages
//!
//! A trip is voted on in three sequential stages (destinations,
//! accommodations, transportation) before it is completed. The trip only
//! moves to the next stage once every participant has voted on every item.
//!
//! ## Votes and tallies
//!
//! A participant likes or passes each item. A later vote on the same item
//! replaces the earlier one. Tallies are recomputed from the full vote set.

pub mod catalog;
pub mod core;
pub mod item;
pub mod trip;
pub mod voting;

// Re-export commonly used types
pub use core::{
    error::DomainError,
    ids::{AccountId, ItemId, ParticipantId, TripId},
};
pub use item::{ItemDetails, TierPrices, VotableItem};
pub use trip::{BudgetTier, Participant, ShareLink, Stage, StageFlags, Trip};
pub use voting::{
    ItemResult, ParticipantStatus, PendingVote, StageReadiness, StageResults, Tally, Vote,
    VoteCounts, VoteKey, VoteProgress, VoteValue, VotingSession, has_voted_on_all,
};
