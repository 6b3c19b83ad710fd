//! Built-in item catalog.

pub mod fallback;
