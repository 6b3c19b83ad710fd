//! Infrastructure layer for tripvote
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: trip stores, the change feed, content
//! generators, activity logging and configuration file loading.

pub mod config;
pub mod generator;
pub mod logging;
pub mod realtime;
pub mod store;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileConfig, FileGeneratorConfig, FileLogConfig,
    FileShareConfig, FileStoreConfig, FileVotingConfig, GeneratorProvider,
};
pub use generator::BuiltinContentGenerator;
#[cfg(feature = "openai")]
pub use generator::OpenAiContentGenerator;
pub use logging::JsonlActivityLogger;
pub use realtime::{ChangeHub, FileWatch};
pub use store::{InMemoryTripStore, JsonFileTripStore, TableStore, TripTables};
