//! Store, share and log configuration from TOML
//! (`[store]`, `[share]` and `[log]` sections)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStoreConfig {
    /// JSON snapshot file; defaults to the user data directory
    pub path: Option<String>,
}

impl FileStoreConfig {
    pub fn resolve_path(&self) -> PathBuf {
        match &self.path {
            Some(path) => expand_home(path),
            None => dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("tripvote")
                .join("trips.json"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileShareConfig {
    /// Origin that share links are built on
    pub base_url: String,
}

impl Default for FileShareConfig {
    fn default() -> Self {
        Self {
            base_url: "https://tripvote.app".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLogConfig {
    /// JSONL activity log path; disabled when unset
    pub activity_log: Option<String>,
}

impl FileLogConfig {
    pub fn activity_log_path(&self) -> Option<PathBuf> {
        self.activity_log.as_deref().map(expand_home)
    }
}

fn expand_home(path: &str) -> PathBuf {
    match path.strip_prefix("~/") {
        Some(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| PathBuf::from(path)),
        None => PathBuf::from(path),
    }
}
