//! Content generator adapters
//!
//! - [`BuiltinContentGenerator`]: the fixed catalog, always available
//! - `OpenAiContentGenerator`: chat-completions endpoint (feature `openai`)

mod builtin;
#[cfg(feature = "openai")]
mod openai;
pub mod prompt;

pub use builtin::BuiltinContentGenerator;
#[cfg(feature = "openai")]
pub use openai::{DEFAULT_API_BASE, OpenAiContentGenerator};
