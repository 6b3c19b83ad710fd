//! Progress notification port
//!
//! Lets the presentation layer follow a participant through a stage and
//! the group through the trip.

use tripvote_domain::{Stage, StageResults};

use crate::use_cases::stage_aggregator::StageSnapshot;

/// Callbacks for voting progress
pub trait VotingProgressNotifier: Send + Sync {
    /// A vote was persisted; `voted` of `total` items are now done.
    fn on_vote_recorded(&self, stage: Stage, voted: usize, total: usize);

    /// The local participant has voted on every item of `stage`.
    fn on_participant_finished(&self, stage: Stage);

    /// The trip moved on to the next stage.
    fn on_stage_advanced(&self, from: Stage, to: Stage);

    /// Fresh group state after a change notification.
    fn on_snapshot(&self, _snapshot: &StageSnapshot) {}

    /// Every stage is decided.
    fn on_trip_finished(&self, _results: &[StageResults]) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl VotingProgressNotifier for NoProgress {
    fn on_vote_recorded(&self, _stage: Stage, _voted: usize, _total: usize) {}
    fn on_participant_finished(&self, _stage: Stage) {}
    fn on_stage_advanced(&self, _from: Stage, _to: Stage) {}
}
