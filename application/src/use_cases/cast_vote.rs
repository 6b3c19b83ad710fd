//! Cast vote use case
//!
//! Persists one participant's vote and, when that vote finishes the
//! participant's item list, records the completion flag and lets the
//! aggregator decide whether the whole stage is done.

use crate::ports::activity_logger::{ActivityEvent, ActivityLogger, NoActivityLogger};
use crate::ports::progress::VotingProgressNotifier;
use crate::ports::store::{StoreError, TripStore};
use crate::use_cases::stage_aggregator::{AggregationError, StageAggregator, StageDecision};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tokio::time::Instant;
use tracing::{debug, info, warn};
use tripvote_domain::{
    DomainError, ItemId, ParticipantId, Stage, TripId, Vote, VoteProgress, VoteValue,
    VotingSession,
};

/// Errors that can occur while voting
#[derive(Error, Debug)]
pub enum VotingError {
    #[error("Trip not found: {0}")]
    TripNotFound(TripId),

    #[error("Participant {0} has not joined this trip")]
    ParticipantNotFound(ParticipantId),

    #[error(transparent)]
    Rejected(#[from] DomainError),

    #[error("Vote was not saved, try again: {0}")]
    VoteNotSaved(StoreError),

    #[error("Stage completion was not saved, try again: {0}")]
    StageNotRecorded(StoreError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Aggregation error: {0}")]
    Aggregation(AggregationError),
}

impl VotingError {
    /// The same action may succeed if repeated.
    pub fn is_retryable(&self) -> bool {
        match self {
            VotingError::VoteNotSaved(_) | VotingError::StageNotRecorded(_) => true,
            VotingError::Store(e) => e.is_transient(),
            VotingError::Rejected(e) => e.is_transient(),
            _ => false,
        }
    }

    /// The trip or participant does not exist; retrying will not help.
    pub fn is_not_found(&self) -> bool {
        match self {
            VotingError::TripNotFound(_) | VotingError::ParticipantNotFound(_) => true,
            VotingError::Store(e) => e.is_not_found(),
            _ => false,
        }
    }
}

impl From<AggregationError> for VotingError {
    fn from(error: AggregationError) -> Self {
        match error {
            AggregationError::TripNotFound(id) => VotingError::TripNotFound(id),
            AggregationError::ParticipantNotFound(id) => VotingError::ParticipantNotFound(id),
            AggregationError::Store(e) => VotingError::Store(e),
            other => VotingError::Aggregation(other),
        }
    }
}

/// Result of a successful submission
#[derive(Debug, Clone)]
pub struct VoteReceipt {
    pub vote: Vote,
    pub progress: VoteProgress,
    /// Set when this vote finished the participant's list
    pub decision: Option<StageDecision>,
}

/// Use case for submitting votes.
pub struct CastVoteUseCase {
    store: Arc<dyn TripStore>,
    aggregator: StageAggregator,
    activity_logger: Arc<dyn ActivityLogger>,
}

impl Clone for CastVoteUseCase {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            aggregator: self.aggregator.clone(),
            activity_logger: self.activity_logger.clone(),
        }
    }
}

impl CastVoteUseCase {
    pub fn new(store: Arc<dyn TripStore>) -> Self {
        Self {
            aggregator: StageAggregator::new(store.clone()),
            store,
            activity_logger: Arc::new(NoActivityLogger),
        }
    }

    pub fn with_activity_logger(mut self, logger: Arc<dyn ActivityLogger>) -> Self {
        self.aggregator = self.aggregator.with_activity_logger(logger.clone());
        self.activity_logger = logger;
        self
    }

    /// Submit a vote on `item_id` for the session's participant.
    ///
    /// On a failed write the session is left exactly as before so the call
    /// can be repeated.
    pub async fn submit_vote(
        &self,
        trip_id: &TripId,
        session: &mut VotingSession,
        item_id: &ItemId,
        value: VoteValue,
        progress: &dyn VotingProgressNotifier,
    ) -> Result<VoteReceipt, VotingError> {
        let pending = session.begin_vote(item_id, value, Instant::now().into_std())?;
        let vote = Vote::new(
            trip_id.clone(),
            pending.stage,
            pending.item_id.clone(),
            session.participant_id().clone(),
            value,
        );

        if let Err(e) = self.store.upsert_vote(&vote).await {
            warn!("Vote on {} not saved: {}", item_id, e);
            session.abort_vote(pending);
            return Err(VotingError::VoteNotSaved(e));
        }

        let outcome = session.confirm_vote(pending, Instant::now().into_std());
        debug!(
            "Vote {} on {} recorded ({} remaining)",
            value,
            item_id,
            session.remaining()
        );
        self.activity_logger.log(ActivityEvent::new(
            "vote_cast",
            json!({
                "trip_id": trip_id.as_str(),
                "stage": vote.stage.as_str(),
                "item_id": vote.item_id.as_str(),
                "participant_id": vote.participant_id.as_str(),
                "value": value.as_str(),
            }),
        ));
        progress.on_vote_recorded(
            session.stage(),
            session.total_items() - session.remaining(),
            session.total_items(),
        );

        let decision = match outcome {
            VoteProgress::StageFinished => Some(self.finish_stage(trip_id, session, progress).await?),
            VoteProgress::Advanced { .. } => None,
        };

        Ok(VoteReceipt {
            vote,
            progress: outcome,
            decision,
        })
    }

    /// Record that the participant is done with the session's stage and run
    /// the completion check.
    ///
    /// Safe to call again after a [`VotingError::StageNotRecorded`].
    pub async fn finish_stage(
        &self,
        trip_id: &TripId,
        session: &VotingSession,
        progress: &dyn VotingProgressNotifier,
    ) -> Result<StageDecision, VotingError> {
        let stage = session.stage();
        if !stage.is_votable() {
            return Ok(StageDecision::Finished);
        }

        self.store
            .set_stage_complete(trip_id, session.participant_id(), stage, true)
            .await
            .map_err(VotingError::StageNotRecorded)?;
        info!(
            "Participant {} finished {}",
            session.participant_id(),
            stage
        );
        self.activity_logger.log(ActivityEvent::new(
            "stage_completed",
            json!({
                "trip_id": trip_id.as_str(),
                "stage": stage.as_str(),
                "participant_id": session.participant_id().as_str(),
            }),
        ));
        progress.on_participant_finished(stage);

        let decision = self.aggregator.check_stage_completion(trip_id, stage).await?;
        match &decision {
            StageDecision::Advanced { from, to } => progress.on_stage_advanced(*from, *to),
            StageDecision::Finished => progress.on_stage_advanced(stage, Stage::Completed),
            StageDecision::Pending { .. } => {}
        }
        Ok(decision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::progress::NoProgress;
    use crate::use_cases::test_support::MockStore;
    use std::sync::Mutex;
    use std::sync::atomic::Ordering;
    use std::time::Duration;
    use tripvote_domain::{Trip, VotableItem};

    #[derive(Default)]
    struct RecordingProgress {
        events: Mutex<Vec<String>>,
    }

    impl VotingProgressNotifier for RecordingProgress {
        fn on_vote_recorded(&self, stage: Stage, voted: usize, total: usize) {
            self.events
                .lock()
                .unwrap()
                .push(format!("vote {stage} {voted}/{total}"));
        }

        fn on_participant_finished(&self, stage: Stage) {
            self.events.lock().unwrap().push(format!("done {stage}"));
        }

        fn on_stage_advanced(&self, from: Stage, to: Stage) {
            self.events
                .lock()
                .unwrap()
                .push(format!("advance {from} {to}"));
        }
    }

    struct Fixture {
        store: Arc<MockStore>,
        use_case: CastVoteUseCase,
        trip: Trip,
        items: Vec<VotableItem>,
    }

    fn fixture(item_count: usize) -> Fixture {
        let store = Arc::new(MockStore::new());
        let trip = store.seed_trip();
        let items = store.seed_items(&trip, Stage::Destinations, item_count);
        let use_case = CastVoteUseCase::new(store.clone());
        Fixture {
            store,
            use_case,
            trip,
            items,
        }
    }

    fn session_for(f: &Fixture, participant: &ParticipantId) -> VotingSession {
        VotingSession::resume(
            participant.clone(),
            Stage::Destinations,
            &f.items,
            &Vec::<Vote>::new(),
        )
        .with_cooldown(Duration::ZERO)
    }

    #[tokio::test]
    async fn test_vote_advances_session() {
        let f = fixture(3);
        let ana = f.store.seed_participant(&f.trip, "Ana");
        let mut session = session_for(&f, &ana.id);

        let receipt = f
            .use_case
            .submit_vote(&f.trip.id, &mut session, &f.items[0].id, VoteValue::Like, &NoProgress)
            .await
            .unwrap();

        assert_eq!(receipt.progress, VoteProgress::Advanced { index: 1 });
        assert!(receipt.decision.is_none());
        assert_eq!(f.store.vote_count(), 1);
        assert!(!f.store.participant(&ana.id).has_completed(Stage::Destinations));
    }

    #[tokio::test]
    async fn test_failed_write_leaves_session_unchanged() {
        let f = fixture(2);
        let ana = f.store.seed_participant(&f.trip, "Ana");
        let mut session = session_for(&f, &ana.id);
        f.store.fail_vote_writes.store(true, Ordering::SeqCst);

        let error = f
            .use_case
            .submit_vote(&f.trip.id, &mut session, &f.items[0].id, VoteValue::Like, &NoProgress)
            .await
            .unwrap_err();

        assert!(error.is_retryable());
        assert_eq!(session.current_index(), 0);
        assert!(session.votes_cast().is_empty());
        assert!(!session.is_submitting());

        f.store.fail_vote_writes.store(false, Ordering::SeqCst);
        let receipt = f
            .use_case
            .submit_vote(&f.trip.id, &mut session, &f.items[0].id, VoteValue::Like, &NoProgress)
            .await
            .unwrap();
        assert_eq!(receipt.progress, VoteProgress::Advanced { index: 1 });
    }

    #[tokio::test]
    async fn test_last_vote_sets_flag_and_advances_single_participant() {
        let f = fixture(2);
        let ana = f.store.seed_participant(&f.trip, "Ana");
        let mut session = session_for(&f, &ana.id);
        let progress = RecordingProgress::default();

        for item in &f.items {
            f.use_case
                .submit_vote(&f.trip.id, &mut session, &item.id, VoteValue::Pass, &progress)
                .await
                .unwrap();
        }

        assert!(f.store.participant(&ana.id).has_completed(Stage::Destinations));
        assert_eq!(f.store.trip(&f.trip.id).current_stage, Stage::Accommodations);
        assert_eq!(
            *progress.events.lock().unwrap(),
            vec![
                "vote destinations 1/2".to_string(),
                "vote destinations 2/2".to_string(),
                "done destinations".to_string(),
                "advance destinations accommodations".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_finishing_first_of_two_stays_pending() {
        let f = fixture(1);
        let ana = f.store.seed_participant(&f.trip, "Ana");
        let ben = f.store.seed_participant(&f.trip, "Ben");
        let mut session = session_for(&f, &ana.id);

        let receipt = f
            .use_case
            .submit_vote(&f.trip.id, &mut session, &f.items[0].id, VoteValue::Like, &NoProgress)
            .await
            .unwrap();

        assert_eq!(receipt.progress, VoteProgress::StageFinished);
        assert_eq!(
            receipt.decision,
            Some(StageDecision::Pending {
                waiting_on: vec![ben.id]
            })
        );
        assert_eq!(f.store.trip(&f.trip.id).current_stage, Stage::Destinations);
    }

    #[tokio::test]
    async fn test_flag_failure_is_retryable_via_finish_stage() {
        let f = fixture(1);
        let ana = f.store.seed_participant(&f.trip, "Ana");
        let mut session = session_for(&f, &ana.id);
        f.store.fail_flag_writes.store(true, Ordering::SeqCst);

        let error = f
            .use_case
            .submit_vote(&f.trip.id, &mut session, &f.items[0].id, VoteValue::Like, &NoProgress)
            .await
            .unwrap_err();
        assert!(matches!(error, VotingError::StageNotRecorded(_)));
        assert!(error.is_retryable());
        assert!(session.is_stage_done());

        f.store.fail_flag_writes.store(false, Ordering::SeqCst);
        let decision = f
            .use_case
            .finish_stage(&f.trip.id, &session, &NoProgress)
            .await
            .unwrap();
        assert_eq!(
            decision,
            StageDecision::Advanced {
                from: Stage::Destinations,
                to: Stage::Accommodations
            }
        );
    }

    #[tokio::test]
    async fn test_unknown_item_is_rejected_without_write() {
        let f = fixture(1);
        let ana = f.store.seed_participant(&f.trip, "Ana");
        let mut session = session_for(&f, &ana.id);

        let error = f
            .use_case
            .submit_vote(
                &f.trip.id,
                &mut session,
                &ItemId::new("nope"),
                VoteValue::Like,
                &NoProgress,
            )
            .await
            .unwrap_err();

        assert!(matches!(
            error,
            VotingError::Rejected(DomainError::ItemNotInStage { .. })
        ));
        assert_eq!(f.store.vote_writes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_cooldown_blocks_rapid_second_vote() {
        let f = fixture(2);
        let ana = f.store.seed_participant(&f.trip, "Ana");
        let mut session = session_for(&f, &ana.id).with_cooldown(Duration::from_secs(60));

        f.use_case
            .submit_vote(&f.trip.id, &mut session, &f.items[0].id, VoteValue::Like, &NoProgress)
            .await
            .unwrap();
        let error = f
            .use_case
            .submit_vote(&f.trip.id, &mut session, &f.items[1].id, VoteValue::Like, &NoProgress)
            .await
            .unwrap_err();

        assert!(matches!(
            error,
            VotingError::Rejected(DomainError::SubmissionInFlight)
        ));
        assert_eq!(f.store.vote_writes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_error_classification() {
        assert!(VotingError::TripNotFound(TripId::new("t")).is_not_found());
        assert!(!VotingError::TripNotFound(TripId::new("t")).is_retryable());
        assert!(VotingError::Store(StoreError::Unavailable("x".into())).is_retryable());
        assert!(!VotingError::Rejected(DomainError::VotingClosed).is_retryable());
    }
}
