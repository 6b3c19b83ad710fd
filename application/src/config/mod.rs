//! Application-level configuration.
//!
//! - [`VotingParams`]: submission pacing
//! - [`GenerationParams`]: item counts per stage

pub mod generation_params;
pub mod voting_params;

pub use generation_params::GenerationParams;
pub use voting_params::VotingParams;
