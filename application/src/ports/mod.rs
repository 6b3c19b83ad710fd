//! Port definitions (interfaces for external adapters)

pub mod activity_logger;
pub mod content_generator;
pub mod progress;
pub mod realtime;
pub mod store;
