//! Live trip session
//!
//! Keeps one participant's [`VotingSession`] in step with the rest of the
//! group. Each change notification triggers a full reload of the trip's
//! state; the session follows the trip when its stage advances.
//!
//! ```text
//!   ChangeFeed ──event──▶ snapshot ──▶ check_stage_completion ──▶ follow_trip
//!                             │                                       │
//!                             └──────────── on_snapshot ◀─────────────┘
//! ```

use crate::config::VotingParams;
use crate::ports::activity_logger::{ActivityLogger, NoActivityLogger};
use crate::ports::progress::VotingProgressNotifier;
use crate::ports::realtime::{ChangeEvent, ChangeFeed, ChangeSubscription, ChangeTable};
use crate::ports::store::TripStore;
use crate::use_cases::cast_vote::{CastVoteUseCase, VoteReceipt, VotingError};
use crate::use_cases::open_session::{OpenSessionUseCase, OpenedSession};
use crate::use_cases::stage_aggregator::{StageAggregator, StageDecision, StageSnapshot};
use std::sync::Arc;
use tracing::{debug, info};
use tripvote_domain::{
    ItemId, Participant, ParticipantId, Stage, StageReadiness, Trip, TripId, VotableItem,
    VoteValue, VotingSession,
};

/// Group state after processing a notification
#[derive(Debug, Clone)]
pub struct LiveUpdate {
    pub snapshot: StageSnapshot,
    pub decision: StageDecision,
    /// Stage the local session moved to, if it moved
    pub moved_to: Option<Stage>,
}

/// A participant connected to a trip's change feed.
pub struct LiveTripSession {
    trip_id: TripId,
    opened: OpenedSession,
    subscription: ChangeSubscription,
    aggregator: StageAggregator,
    opener: OpenSessionUseCase,
    voter: CastVoteUseCase,
}

impl LiveTripSession {
    /// Subscribe to the trip and open the participant's session.
    ///
    /// The subscription is taken before the initial load so no change made
    /// in between is missed.
    pub async fn start(
        store: Arc<dyn TripStore>,
        feed: Arc<dyn ChangeFeed>,
        trip_id: &TripId,
        participant_id: &ParticipantId,
        params: VotingParams,
    ) -> Result<Self, VotingError> {
        Self::start_with_logger(
            store,
            feed,
            trip_id,
            participant_id,
            params,
            Arc::new(NoActivityLogger),
        )
        .await
    }

    pub async fn start_with_logger(
        store: Arc<dyn TripStore>,
        feed: Arc<dyn ChangeFeed>,
        trip_id: &TripId,
        participant_id: &ParticipantId,
        params: VotingParams,
        activity_logger: Arc<dyn ActivityLogger>,
    ) -> Result<Self, VotingError> {
        let subscription = feed.subscribe(trip_id).await?;
        let opener = OpenSessionUseCase::new(store.clone()).with_params(params);
        let opened = opener.execute(trip_id, participant_id).await?;
        info!("Live session started for trip {}", trip_id);

        Ok(Self {
            trip_id: trip_id.clone(),
            opened,
            subscription,
            aggregator: StageAggregator::new(store.clone())
                .with_activity_logger(activity_logger.clone()),
            opener,
            voter: CastVoteUseCase::new(store).with_activity_logger(activity_logger),
        })
    }

    pub fn trip(&self) -> &Trip {
        &self.opened.trip
    }

    pub fn participant(&self) -> &Participant {
        &self.opened.participant
    }

    pub fn session(&self) -> &VotingSession {
        &self.opened.session
    }

    /// Items of the session's stage in display order.
    pub fn items(&self) -> &[VotableItem] {
        &self.opened.items
    }

    /// The item the participant is looking at.
    pub fn current_item(&self) -> Option<&VotableItem> {
        let id = self.opened.session.current_item()?;
        self.opened.items.iter().find(|item| &item.id == id)
    }

    pub fn rewind_to(&mut self, item_id: &ItemId) -> Result<usize, VotingError> {
        Ok(self.opened.session.rewind_to(item_id)?)
    }

    /// Submit a vote and follow the trip if it finished the stage.
    pub async fn vote(
        &mut self,
        item_id: &ItemId,
        value: VoteValue,
        progress: &dyn VotingProgressNotifier,
    ) -> Result<VoteReceipt, VotingError> {
        let receipt = self
            .voter
            .submit_vote(&self.trip_id, &mut self.opened.session, item_id, value, progress)
            .await?;
        if matches!(
            receipt.decision,
            Some(StageDecision::Advanced { .. } | StageDecision::Finished)
        ) {
            self.refresh(progress).await?;
        }
        Ok(receipt)
    }

    /// Retry recording stage completion after a failed flag write.
    pub async fn finish_stage(
        &mut self,
        progress: &dyn VotingProgressNotifier,
    ) -> Result<LiveUpdate, VotingError> {
        self.voter
            .finish_stage(&self.trip_id, &self.opened.session, progress)
            .await?;
        self.refresh(progress).await
    }

    /// Reload group state, close the stage if everyone is done and move the
    /// local session along with the trip.
    pub async fn refresh(
        &mut self,
        progress: &dyn VotingProgressNotifier,
    ) -> Result<LiveUpdate, VotingError> {
        let mut snapshot = self.aggregator.snapshot(&self.trip_id).await?;

        let readiness = snapshot.readiness.clone();
        let decision = match readiness {
            _ if snapshot.stage == Stage::Completed => StageDecision::Finished,
            StageReadiness::Complete { .. } => {
                let decision = self
                    .aggregator
                    .check_stage_completion(&self.trip_id, snapshot.stage)
                    .await?;
                snapshot = self.aggregator.snapshot(&self.trip_id).await?;
                decision
            }
            StageReadiness::Waiting { waiting_on } => StageDecision::Pending { waiting_on },
            StageReadiness::NoParticipants => StageDecision::Pending { waiting_on: vec![] },
        };

        let from = self.opened.session.stage();
        let moved_to = match self
            .opener
            .follow_trip(&snapshot.trip, &mut self.opened.session)
            .await?
        {
            Some(items) => {
                self.opened.items = items;
                let to = self.opened.session.stage();
                progress.on_stage_advanced(from, to);
                Some(to)
            }
            None => None,
        };
        self.opened.trip = snapshot.trip.clone();

        // An empty item set is done as soon as it is entered.
        if moved_to.is_some()
            && !self.opened.session.is_finished()
            && self.opened.session.is_stage_done()
        {
            self.voter
                .finish_stage(&self.trip_id, &self.opened.session, progress)
                .await?;
        }

        progress.on_snapshot(&snapshot);
        Ok(LiveUpdate {
            snapshot,
            decision,
            moved_to,
        })
    }

    fn is_relevant(&self, event: &ChangeEvent) -> bool {
        if event.trip_id != self.trip_id {
            return false;
        }
        match event.table {
            ChangeTable::Votes(stage) | ChangeTable::Items(stage) => {
                stage >= self.opened.session.stage()
            }
            ChangeTable::Participants | ChangeTable::Trip => true,
        }
    }

    /// Wait for the next relevant notification and refresh.
    ///
    /// Events already queued behind it are folded into the same refresh.
    /// Returns `None` once the feed has closed.
    pub async fn next_update(
        &mut self,
        progress: &dyn VotingProgressNotifier,
    ) -> Option<Result<LiveUpdate, VotingError>> {
        loop {
            let event = self.subscription.next().await?;
            let queued = self.subscription.drain();
            let relevant =
                self.is_relevant(&event) || queued.iter().any(|e| self.is_relevant(e));
            if !relevant {
                debug!("Ignoring {} change on {}", event.table, event.trip_id);
                continue;
            }
            return Some(self.refresh(progress).await);
        }
    }

    /// Follow the trip until it reaches [`Stage::Completed`] or the feed
    /// closes. Returns the trip's last known stage.
    pub async fn run_until_finished(
        &mut self,
        progress: &dyn VotingProgressNotifier,
    ) -> Result<Stage, VotingError> {
        let update = self.refresh(progress).await?;
        if update.snapshot.stage == Stage::Completed {
            return Ok(Stage::Completed);
        }

        while let Some(update) = self.next_update(progress).await {
            let update = update?;
            if update.snapshot.stage == Stage::Completed {
                info!("Trip {} finished", self.trip_id);
                return Ok(Stage::Completed);
            }
        }
        Ok(self.opened.trip.current_stage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::progress::NoProgress;
    use crate::ports::realtime::ChangeKind;
    use crate::ports::store::TripRepository;
    use crate::use_cases::test_support::MockStore;
    use std::time::Duration;

    fn params() -> VotingParams {
        VotingParams::default().with_cooldown(Duration::ZERO)
    }

    async fn live(store: &Arc<MockStore>, trip: &Trip, participant: &Participant) -> LiveTripSession {
        LiveTripSession::start(
            store.clone(),
            store.clone(),
            &trip.id,
            &participant.id,
            params(),
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_follows_stage_advanced_by_other_participant() {
        let store = Arc::new(MockStore::new());
        let trip = store.seed_trip();
        let ana = store.seed_participant(&trip, "Ana");
        let ben = store.seed_participant(&trip, "Ben");
        let items = store.seed_items(&trip, Stage::Destinations, 1);
        store.seed_items(&trip, Stage::Accommodations, 2);

        let mut ana_live = live(&store, &trip, &ana).await;
        let mut ben_live = live(&store, &trip, &ben).await;

        ana_live
            .vote(&items[0].id, VoteValue::Like, &NoProgress)
            .await
            .unwrap();
        assert_eq!(ana_live.session().stage(), Stage::Destinations);

        ben_live
            .vote(&items[0].id, VoteValue::Pass, &NoProgress)
            .await
            .unwrap();
        assert_eq!(ben_live.session().stage(), Stage::Accommodations);

        let mut moved = None;
        while moved.is_none() {
            let update = ana_live.next_update(&NoProgress).await.unwrap().unwrap();
            moved = update.moved_to;
        }
        assert_eq!(moved, Some(Stage::Accommodations));
        assert_eq!(ana_live.items().len(), 2);
        assert_eq!(ana_live.session().current_index(), 0);
    }

    #[tokio::test]
    async fn test_refresh_is_idempotent() {
        let store = Arc::new(MockStore::new());
        let trip = store.seed_trip();
        let ana = store.seed_participant(&trip, "Ana");
        store.seed_participant(&trip, "Ben");
        store.seed_items(&trip, Stage::Destinations, 2);
        let mut ana_live = live(&store, &trip, &ana).await;

        let first = ana_live.refresh(&NoProgress).await.unwrap();
        let second = ana_live.refresh(&NoProgress).await.unwrap();

        assert_eq!(first.decision, second.decision);
        assert_eq!(first.snapshot.counts, second.snapshot.counts);
        assert!(first.moved_to.is_none());
        assert_eq!(store.trip(&trip.id).current_stage, Stage::Destinations);
    }

    #[tokio::test]
    async fn test_events_for_older_stage_are_ignored() {
        let store = Arc::new(MockStore::new());
        let trip = store.seed_trip();
        let ana = store.seed_participant(&trip, "Ana");
        store
            .advance_stage(&trip.id, Stage::Destinations, Stage::Accommodations)
            .await
            .unwrap();
        let ana_live = live(&store, &trip, &ana).await;

        let old = ChangeEvent::new(
            trip.id.clone(),
            ChangeTable::Votes(Stage::Destinations),
            ChangeKind::Insert,
        );
        let current = ChangeEvent::new(
            trip.id.clone(),
            ChangeTable::Votes(Stage::Accommodations),
            ChangeKind::Insert,
        );
        let other_trip = ChangeEvent::resync(TripId::new("other"));

        assert!(!ana_live.is_relevant(&old));
        assert!(ana_live.is_relevant(&current));
        assert!(!ana_live.is_relevant(&other_trip));
    }

    #[tokio::test]
    async fn test_run_until_finished_returns_on_completed_trip() {
        let store = Arc::new(MockStore::new());
        let trip = store.seed_trip();
        let ana = store.seed_participant(&trip, "Ana");
        for (from, to) in [
            (Stage::Destinations, Stage::Accommodations),
            (Stage::Accommodations, Stage::Transportation),
            (Stage::Transportation, Stage::Completed),
        ] {
            store.advance_stage(&trip.id, from, to).await.unwrap();
        }
        let mut ana_live = live(&store, &trip, &ana).await;

        let stage = ana_live.run_until_finished(&NoProgress).await.unwrap();

        assert_eq!(stage, Stage::Completed);
        assert!(ana_live.session().is_finished());
    }

    #[tokio::test]
    async fn test_single_participant_votes_through_whole_trip() {
        let store = Arc::new(MockStore::new());
        let trip = store.seed_trip();
        let ana = store.seed_participant(&trip, "Ana");
        for stage in Stage::VOTING {
            store.seed_items(&trip, stage, 2);
        }
        let mut ana_live = live(&store, &trip, &ana).await;

        while !ana_live.session().is_finished() {
            let item = ana_live.session().current_item().cloned().unwrap();
            ana_live
                .vote(&item, VoteValue::Like, &NoProgress)
                .await
                .unwrap();
        }

        assert!(store.trip(&trip.id).is_completed());
        assert_eq!(store.vote_count(), 6);
    }
}
