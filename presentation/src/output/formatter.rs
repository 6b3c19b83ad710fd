//! Output formatter trait

use tripvote_application::TripResults;

/// Trait for formatting trip results
pub trait OutputFormatter {
    /// Format ranked results for every stage
    fn format(&self, results: &TripResults) -> String;

    /// Format as JSON
    fn format_json(&self, results: &TripResults) -> String;
}
