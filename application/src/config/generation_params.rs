//! Generation parameters: how many items each stage starts with.

use serde::{Deserialize, Serialize};
use tripvote_domain::Stage;

/// Requested item counts per stage.
///
/// The generator may return fewer items; it never gets to return more.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationParams {
    pub destinations: usize,
    pub accommodations: usize,
    pub transportation: usize,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            destinations: 8,
            accommodations: 12,
            transportation: 10,
        }
    }
}

impl GenerationParams {
    pub fn count_for(&self, stage: Stage) -> usize {
        match stage {
            Stage::Destinations => self.destinations,
            Stage::Accommodations => self.accommodations,
            Stage::Transportation => self.transportation,
            Stage::Completed => 0,
        }
    }

    pub fn with_count(mut self, stage: Stage, count: usize) -> Self {
        match stage {
            Stage::Destinations => self.destinations = count,
            Stage::Accommodations => self.accommodations = count,
            Stage::Transportation => self.transportation = count,
            Stage::Completed => {}
        }
        self
    }
}
