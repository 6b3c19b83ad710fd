//! Open session use case
//!
//! Loads everything a participant needs to vote and rebuilds their
//! [`VotingSession`] from persisted votes, so a reload resumes at the first
//! item still lacking a vote.

use crate::config::VotingParams;
use crate::ports::store::TripStore;
use crate::use_cases::cast_vote::VotingError;
use crate::use_cases::stage_aggregator::StageAggregator;
use std::sync::Arc;
use tracing::{debug, info};
use tripvote_domain::{Participant, ParticipantId, Stage, Trip, TripId, VotableItem, VotingSession};

/// A participant's view of a trip, ready for voting
#[derive(Debug, Clone)]
pub struct OpenedSession {
    pub trip: Trip,
    pub participant: Participant,
    /// Items of the trip's current stage in display order
    pub items: Vec<VotableItem>,
    pub session: VotingSession,
}

pub struct OpenSessionUseCase {
    store: Arc<dyn TripStore>,
    aggregator: StageAggregator,
    params: VotingParams,
}

impl OpenSessionUseCase {
    pub fn new(store: Arc<dyn TripStore>) -> Self {
        Self {
            aggregator: StageAggregator::new(store.clone()),
            store,
            params: VotingParams::default(),
        }
    }

    pub fn with_params(mut self, params: VotingParams) -> Self {
        self.params = params;
        self
    }

    pub async fn execute(
        &self,
        trip_id: &TripId,
        participant_id: &ParticipantId,
    ) -> Result<OpenedSession, VotingError> {
        let trip = self
            .store
            .get_trip(trip_id)
            .await?
            .ok_or_else(|| VotingError::TripNotFound(trip_id.clone()))?;
        let stage = trip.current_stage;

        if stage.is_votable() {
            self.aggregator
                .reconcile_participant(trip_id, participant_id, stage)
                .await?;
        }

        let participant = self
            .store
            .get_participant(trip_id, participant_id)
            .await?
            .ok_or_else(|| VotingError::ParticipantNotFound(participant_id.clone()))?;

        let (items, session) = self.load_stage(trip_id, participant_id, stage).await?;
        info!(
            "Opened {} session for {} at item {}/{}",
            stage,
            participant.name,
            session.current_index(),
            session.total_items()
        );

        Ok(OpenedSession {
            trip,
            participant,
            items,
            session,
        })
    }

    /// Move `session` forward when the trip has advanced past its stage.
    ///
    /// Returns the new stage's items when the session moved, `None` when the
    /// session is already at the trip's stage.
    pub async fn follow_trip(
        &self,
        trip: &Trip,
        session: &mut VotingSession,
    ) -> Result<Option<Vec<VotableItem>>, VotingError> {
        if trip.current_stage <= session.stage() {
            return Ok(None);
        }
        let stage = trip.current_stage;
        let items = self.stage_items(&trip.id, stage).await?;
        let votes = if stage.is_votable() {
            self.store
                .votes_by_participant(&trip.id, stage, session.participant_id())
                .await?
        } else {
            Vec::new()
        };
        debug!("Session moving from {} to {}", session.stage(), stage);
        session.enter_stage(stage, &items, &votes)?;
        Ok(Some(items))
    }

    async fn stage_items(
        &self,
        trip_id: &TripId,
        stage: Stage,
    ) -> Result<Vec<VotableItem>, VotingError> {
        if !stage.is_votable() {
            return Ok(Vec::new());
        }
        Ok(self.store.items_for_stage(trip_id, stage).await?)
    }

    async fn load_stage(
        &self,
        trip_id: &TripId,
        participant_id: &ParticipantId,
        stage: Stage,
    ) -> Result<(Vec<VotableItem>, VotingSession), VotingError> {
        let items = self.stage_items(trip_id, stage).await?;
        let votes = if stage.is_votable() {
            self.store
                .votes_by_participant(trip_id, stage, participant_id)
                .await?
        } else {
            Vec::new()
        };
        let session = VotingSession::resume(participant_id.clone(), stage, &items, &votes)
            .with_cooldown(self.params.cooldown);
        Ok((items, session))
    }
}
