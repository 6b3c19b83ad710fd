//! Votable items (destinations, accommodations, transportation legs).

pub mod entities;

pub use entities::{ItemDetails, TierPrices, VotableItem};
