//! Trips, participants, budget tiers, stages and share links.

pub mod budget;
pub mod entities;
pub mod share;
pub mod stage;

pub use budget::BudgetTier;
pub use entities::{Participant, StageFlags, Trip};
pub use share::ShareLink;
pub use stage::Stage;
