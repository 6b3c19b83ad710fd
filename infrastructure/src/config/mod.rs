//! Configuration file loading for tripvote
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `TRIPVOTE_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./tripvote.toml` or `./.tripvote.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/tripvote/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileConfig, FileGeneratorConfig, FileLogConfig, FileShareConfig,
    FileStoreConfig, FileVotingConfig, GeneratorProvider,
};
pub use loader::ConfigLoader;
