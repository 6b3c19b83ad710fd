//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod cast_vote;
pub mod create_trip;
pub mod generate_items;
pub mod join_trip;
pub mod live_session;
pub mod open_session;
pub mod stage_aggregator;
pub mod trip_results;

#[cfg(test)]
pub(crate) mod test_support;
