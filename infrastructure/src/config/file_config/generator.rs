//! Content generator configuration from TOML (`[generator]` section)

use super::ConfigValidationError;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tripvote_application::GenerationParams;

/// Which generator adapter to build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorProvider {
    OpenAi,
    Builtin,
}

impl GeneratorProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            GeneratorProvider::OpenAi => "openai",
            GeneratorProvider::Builtin => "builtin",
        }
    }
}

impl std::str::FromStr for GeneratorProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" | "open_ai" => Ok(GeneratorProvider::OpenAi),
            "builtin" | "fallback" | "none" => Ok(GeneratorProvider::Builtin),
            _ => Err(format!("Unknown generator provider: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileGeneratorConfig {
    /// "openai" or "builtin"
    pub provider: String,
    /// Base URL of the chat-completions API
    pub api_base: String,
    pub model: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Direct API key (prefer `api_key_env`)
    pub api_key: Option<String>,
    pub timeout_seconds: u64,
    pub destinations: usize,
    pub accommodations: usize,
    pub transportation: usize,
}

impl Default for FileGeneratorConfig {
    fn default() -> Self {
        let counts = GenerationParams::default();
        Self {
            provider: "openai".to_string(),
            api_base: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            api_key: None,
            timeout_seconds: 60,
            destinations: counts.destinations,
            accommodations: counts.accommodations,
            transportation: counts.transportation,
        }
    }
}

impl FileGeneratorConfig {
    pub fn parse_provider(&self) -> Result<GeneratorProvider, ConfigValidationError> {
        self.provider
            .parse()
            .map_err(|_| ConfigValidationError::UnknownProvider(self.provider.clone()))
    }

    /// API key from the config file, else from `api_key_env`.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var(&self.api_key_env).ok())
            .filter(|key| !key.trim().is_empty())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn to_params(&self) -> GenerationParams {
        GenerationParams {
            destinations: self.destinations,
            accommodations: self.accommodations,
            transportation: self.transportation,
        }
    }

    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut issues = Vec::new();
        if let Err(e) = self.parse_provider() {
            issues.push(e);
        }
        if self.timeout_seconds == 0 {
            issues.push(ConfigValidationError::InvalidTimeout);
        }
        if self.model.trim().is_empty() {
            issues.push(ConfigValidationError::EmptyModelName);
        }
        for (section, count) in [
            ("destinations", self.destinations),
            ("accommodations", self.accommodations),
            ("transportation", self.transportation),
        ] {
            if count == 0 {
                issues.push(ConfigValidationError::ZeroItemCount(section));
            }
        }
        issues
    }
}
