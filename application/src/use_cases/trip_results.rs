//! Trip results use case
//!
//! Ranks every stage's items for the results view. Works at any stage;
//! stages that have not been voted on yet simply show zero votes.

use crate::ports::store::{StoreError, TripStore};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tripvote_domain::{Stage, StageResults, Trip, TripId};

#[derive(Error, Debug)]
pub enum TripResultsError {
    #[error("Trip not found: {0}")]
    TripNotFound(TripId),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Ranking plus turnout for one stage
#[derive(Debug, Clone, Serialize)]
pub struct StageSummary {
    pub results: StageResults,
    /// Participants whose flag for the stage is set
    pub voted_count: usize,
    pub total_participants: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct TripResults {
    pub trip: Trip,
    pub stages: Vec<StageSummary>,
}

impl TripResults {
    pub fn stage(&self, stage: Stage) -> Option<&StageSummary> {
        self.stages.iter().find(|s| s.results.stage == stage)
    }
}

pub struct TripResultsUseCase {
    store: Arc<dyn TripStore>,
}

impl TripResultsUseCase {
    pub fn new(store: Arc<dyn TripStore>) -> Self {
        Self { store }
    }

    pub async fn execute(&self, trip_id: &TripId) -> Result<TripResults, TripResultsError> {
        let trip = self
            .store
            .get_trip(trip_id)
            .await?
            .ok_or_else(|| TripResultsError::TripNotFound(trip_id.clone()))?;
        let participants = self.store.participants(trip_id).await?;

        let mut stages = Vec::with_capacity(Stage::VOTING.len());
        for stage in Stage::VOTING {
            let items = self.store.items_for_stage(trip_id, stage).await?;
            let votes = self.store.votes_for_stage(trip_id, stage).await?;
            stages.push(StageSummary {
                results: StageResults::rank(stage, &items, &votes, &participants),
                voted_count: participants
                    .iter()
                    .filter(|p| p.has_completed(stage))
                    .count(),
                total_participants: participants.len(),
            });
        }

        Ok(TripResults { trip, stages })
    }
}
