//! Presentation layer for tripvote
//!
//! This crate contains CLI definitions, output formatters
//! and progress reporters.

pub mod cli;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::{Cli, Command, CreateArgs, GenerateArgs, JoinArgs, OutputFormat, VoteArgs};
pub use cli::vote_input::VoteCommand;
pub use output::console::ConsoleFormatter;
pub use output::formatter::OutputFormatter;
pub use progress::reporter::{ProgressReporter, SimpleProgress};
