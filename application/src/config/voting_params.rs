//! Voting parameters: submission pacing.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tripvote_domain::voting::session::DEFAULT_COOLDOWN;

/// Controls how quickly a participant may submit consecutive votes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VotingParams {
    /// Pause after each confirmed vote before the next one is accepted.
    pub cooldown: Duration,
}

impl Default for VotingParams {
    fn default() -> Self {
        Self {
            cooldown: DEFAULT_COOLDOWN,
        }
    }
}

impl VotingParams {
    pub fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = cooldown;
        self
    }

    pub fn with_cooldown_ms(self, millis: u64) -> Self {
        self.with_cooldown(Duration::from_millis(millis))
    }
}
