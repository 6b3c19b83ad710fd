//! Port for structured activity logging.
//!
//! Records what happened to a trip (votes, stage transitions, generated
//! content) in a machine-readable log. This is separate from `tracing`,
//! which carries human-readable diagnostics.

use serde_json::Value;

/// A structured activity event.
pub struct ActivityEvent {
    /// Event type identifier (e.g. "vote_cast", "stage_advanced").
    pub event_type: &'static str,
    pub payload: Value,
}

impl ActivityEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Implementations write each event as a single record. Logging never
/// fails the caller.
pub trait ActivityLogger: Send + Sync {
    fn log(&self, event: ActivityEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoActivityLogger;

impl ActivityLogger for NoActivityLogger {
    fn log(&self, _event: ActivityEvent) {}
}
