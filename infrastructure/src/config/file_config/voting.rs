//! Voting configuration from TOML (`[voting]` section)

use serde::{Deserialize, Serialize};
use tripvote_application::VotingParams;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileVotingConfig {
    /// Pause between consecutive votes in milliseconds
    pub cooldown_ms: u64,
}

impl Default for FileVotingConfig {
    fn default() -> Self {
        Self { cooldown_ms: 300 }
    }
}

impl FileVotingConfig {
    pub fn to_params(&self) -> VotingParams {
        VotingParams::default().with_cooldown_ms(self.cooldown_ms)
    }
}
