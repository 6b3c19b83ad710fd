//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.

mod generator;
mod store;
mod voting;

pub use generator::{FileGeneratorConfig, GeneratorProvider};
pub use store::{FileLogConfig, FileShareConfig, FileStoreConfig};
pub use voting::FileVotingConfig;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigValidationError {
    #[error("generator.timeout_seconds cannot be 0")]
    InvalidTimeout,

    #[error("generator.model cannot be empty")]
    EmptyModelName,

    #[error("generator.{0} must request at least one item")]
    ZeroItemCount(&'static str),

    #[error("unknown generator provider '{0}' (expected 'openai' or 'builtin')")]
    UnknownProvider(String),

    #[error("share.base_url must start with http:// or https:// (got '{0}')")]
    InvalidBaseUrl(String),
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub voting: FileVotingConfig,
    pub generator: FileGeneratorConfig,
    pub store: FileStoreConfig,
    pub share: FileShareConfig,
    pub log: FileLogConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut issues = self.generator.validate();

        let base = self.share.base_url.trim();
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            issues.push(ConfigValidationError::InvalidBaseUrl(base.to_string()));
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[voting]
cooldown_ms = 150

[generator]
provider = "builtin"
destinations = 5

[store]
path = "/var/lib/tripvote/trips.json"

[share]
base_url = "https://trips.example.com"

[log]
activity_log = "/tmp/activity.jsonl"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.voting.cooldown_ms, 150);
        assert_eq!(
            config.generator.parse_provider(),
            Ok(GeneratorProvider::Builtin)
        );
        assert_eq!(config.generator.destinations, 5);
        assert_eq!(config.generator.accommodations, 12);
        assert_eq!(config.share.base_url, "https://trips.example.com");
        assert!(config.log.activity_log.is_some());
    }

    #[test]
    fn test_deserialize_partial_config() {
        let config: FileConfig = toml::from_str("[voting]\ncooldown_ms = 0\n").unwrap();
        assert_eq!(config.voting.cooldown_ms, 0);
        assert_eq!(config.generator, FileGeneratorConfig::default());
        assert_eq!(config.share.base_url, "https://tripvote.app");
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(FileConfig::default().validate().is_empty());
    }

    #[test]
    fn test_validate_base_url() {
        let mut config = FileConfig::default();
        config.share.base_url = "tripvote.app".to_string();
        assert_eq!(
            config.validate(),
            vec![ConfigValidationError::InvalidBaseUrl(
                "tripvote.app".to_string()
            )]
        );
    }
}
