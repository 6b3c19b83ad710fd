//! Stage aggregation
//!
//! Recomputes group state for a trip from the store and decides when the
//! active stage is over. Every call reads full state; nothing is cached, so
//! duplicate or out-of-order change notifications are harmless.
//!
//! ```text
//!   participants ──▶ StageReadiness::evaluate ──▶ Complete? ──▶ advance_stage(from, next)
//!                                                    │                 │
//!                                                    ▼                 ▼
//!                                                 Pending      Advanced / Finished
//! ```

use crate::ports::activity_logger::{ActivityEvent, ActivityLogger, NoActivityLogger};
use crate::ports::store::{StoreError, TripStore};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};
use tripvote_domain::{
    ParticipantId, ParticipantStatus, Stage, StageReadiness, Trip, TripId, VotableItem,
    VoteCounts, has_voted_on_all,
};

/// Errors that can occur during aggregation
#[derive(Error, Debug)]
pub enum AggregationError {
    #[error("Trip not found: {0}")]
    TripNotFound(TripId),

    #[error("Participant not found: {0}")]
    ParticipantNotFound(ParticipantId),

    #[error("Trip is at {current}, cannot evaluate later stage {requested}")]
    StageAhead { requested: Stage, current: Stage },

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Outcome of a completion check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageDecision {
    /// The stage stays open; these participants still have items left
    Pending { waiting_on: Vec<ParticipantId> },
    /// The trip is now past `from`
    Advanced { from: Stage, to: Stage },
    /// The trip reached [`Stage::Completed`]
    Finished,
}

impl StageDecision {
    pub fn is_pending(&self) -> bool {
        matches!(self, StageDecision::Pending { .. })
    }
}

/// Group view of the trip's active stage
#[derive(Debug, Clone)]
pub struct StageSnapshot {
    pub trip: Trip,
    pub stage: Stage,
    pub items: Vec<VotableItem>,
    pub counts: VoteCounts,
    pub participants: Vec<ParticipantStatus>,
    pub readiness: StageReadiness,
}

impl StageSnapshot {
    /// "voted / total" participant count for the stage
    pub fn done_count(&self) -> (usize, usize) {
        let done = self.participants.iter().filter(|p| p.done).count();
        (done, self.participants.len())
    }
}

/// Aggregates votes and completion flags for one trip at a time.
pub struct StageAggregator {
    store: Arc<dyn TripStore>,
    activity_logger: Arc<dyn ActivityLogger>,
}

impl Clone for StageAggregator {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            activity_logger: self.activity_logger.clone(),
        }
    }
}

impl StageAggregator {
    pub fn new(store: Arc<dyn TripStore>) -> Self {
        Self {
            store,
            activity_logger: Arc::new(NoActivityLogger),
        }
    }

    pub fn with_activity_logger(mut self, logger: Arc<dyn ActivityLogger>) -> Self {
        self.activity_logger = logger;
        self
    }

    async fn load_trip(&self, trip_id: &TripId) -> Result<Trip, AggregationError> {
        self.store
            .get_trip(trip_id)
            .await?
            .ok_or_else(|| AggregationError::TripNotFound(trip_id.clone()))
    }

    /// Close `stage` if every participant is done with it.
    ///
    /// When `stage` is no longer the trip's current stage nothing is
    /// written and the trip's actual position is reported.
    pub async fn check_stage_completion(
        &self,
        trip_id: &TripId,
        stage: Stage,
    ) -> Result<StageDecision, AggregationError> {
        let trip = self.load_trip(trip_id).await?;

        if trip.current_stage == Stage::Completed {
            return Ok(StageDecision::Finished);
        }
        if trip.current_stage > stage {
            debug!(
                "Stage {} of trip {} already closed (now {})",
                stage, trip_id, trip.current_stage
            );
            return Ok(StageDecision::Advanced {
                from: stage,
                to: trip.current_stage,
            });
        }
        if trip.current_stage < stage {
            return Err(AggregationError::StageAhead {
                requested: stage,
                current: trip.current_stage,
            });
        }

        let participants = self.store.participants(trip_id).await?;
        match StageReadiness::evaluate(stage, &participants) {
            StageReadiness::NoParticipants => Ok(StageDecision::Pending { waiting_on: vec![] }),
            StageReadiness::Waiting { waiting_on } => {
                debug!(
                    "Stage {} of trip {} waiting on {} participant(s)",
                    stage,
                    trip_id,
                    waiting_on.len()
                );
                Ok(StageDecision::Pending { waiting_on })
            }
            StageReadiness::Complete { next } => {
                let now_at = self.store.advance_stage(trip_id, stage, next).await?;
                info!("Trip {} advanced from {} to {}", trip_id, stage, now_at);
                self.activity_logger.log(ActivityEvent::new(
                    "stage_advanced",
                    json!({
                        "trip_id": trip_id.as_str(),
                        "from": stage.as_str(),
                        "to": now_at.as_str(),
                    }),
                ));

                if now_at == Stage::Completed {
                    Ok(StageDecision::Finished)
                } else {
                    Ok(StageDecision::Advanced {
                        from: stage,
                        to: now_at,
                    })
                }
            }
        }
    }

    /// Like/pass counts for every item of `stage`, from a full scan.
    pub async fn compute_vote_counts(
        &self,
        trip_id: &TripId,
        stage: Stage,
    ) -> Result<VoteCounts, AggregationError> {
        let items = self.store.items_for_stage(trip_id, stage).await?;
        let votes = self.store.votes_for_stage(trip_id, stage).await?;
        Ok(VoteCounts::tally(&items, &votes))
    }

    /// Read-only view of the trip's current stage.
    pub async fn snapshot(&self, trip_id: &TripId) -> Result<StageSnapshot, AggregationError> {
        let trip = self.load_trip(trip_id).await?;
        let stage = trip.current_stage;

        let (items, counts) = if stage.is_votable() {
            let items = self.store.items_for_stage(trip_id, stage).await?;
            let votes = self.store.votes_for_stage(trip_id, stage).await?;
            let counts = VoteCounts::tally(&items, &votes);
            (items, counts)
        } else {
            (Vec::new(), VoteCounts::default())
        };

        let participants = self.store.participants(trip_id).await?;
        let readiness = StageReadiness::evaluate(stage, &participants);
        let participants = participants
            .iter()
            .map(|p| ParticipantStatus::for_stage(p, stage))
            .collect();

        Ok(StageSnapshot {
            trip,
            stage,
            items,
            counts,
            participants,
            readiness,
        })
    }

    /// Recompute one participant's flag for `stage` from their votes and
    /// persist it when it is out of date. Returns the flag value.
    pub async fn reconcile_participant(
        &self,
        trip_id: &TripId,
        participant_id: &ParticipantId,
        stage: Stage,
    ) -> Result<bool, AggregationError> {
        let participant = self
            .store
            .get_participant(trip_id, participant_id)
            .await?
            .ok_or_else(|| AggregationError::ParticipantNotFound(participant_id.clone()))?;
        if !stage.is_votable() {
            return Ok(true);
        }

        let items = self.store.items_for_stage(trip_id, stage).await?;
        let votes = self
            .store
            .votes_by_participant(trip_id, stage, participant_id)
            .await?;
        let done = has_voted_on_all(&items, participant_id, &votes);

        if participant.has_completed(stage) != done {
            info!(
                "Repairing {} flag of participant {} ({} -> {})",
                stage,
                participant_id,
                participant.has_completed(stage),
                done
            );
            self.store
                .set_stage_complete(trip_id, participant_id, stage, done)
                .await?;
        }
        Ok(done)
    }
}
