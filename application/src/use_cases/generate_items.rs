//! Generate trip items use case
//!
//! Fills each voting stage's item set from the content generator. Any
//! generator failure is absorbed per stage by substituting the built-in
//! catalog, so a trip can always proceed to voting.

use crate::config::GenerationParams;
use crate::ports::activity_logger::{ActivityEvent, ActivityLogger, NoActivityLogger};
use crate::ports::content_generator::{ContentGenerator, GenerationRequest, Preferences};
use crate::ports::store::{StoreError, TripStore};
use futures::future::join_all;
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};
use tripvote_domain::catalog::fallback;
use tripvote_domain::{ItemDetails, Stage, Trip, TripId, VotableItem};

const DEFAULT_DEPARTURE: &str = "Home";

#[derive(Error, Debug)]
pub enum GenerateItemsError {
    #[error("Trip not found: {0}")]
    TripNotFound(TripId),

    #[error("Please provide at least one preference")]
    NoPreferences,

    #[error("Items are locked: voting has already started (trip is at {0})")]
    ItemsLocked(Stage),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Where a stage's items came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemSource {
    Generator(String),
    Fallback { reason: String },
}

impl ItemSource {
    pub fn is_fallback(&self) -> bool {
        matches!(self, ItemSource::Fallback { .. })
    }
}

#[derive(Debug, Clone)]
pub struct StageGeneration {
    pub stage: Stage,
    pub items: Vec<VotableItem>,
    pub source: ItemSource,
}

#[derive(Debug, Clone)]
pub struct GenerateItemsInput {
    pub trip_id: TripId,
    pub preferences: Preferences,
    pub stages: Vec<Stage>,
}

impl GenerateItemsInput {
    /// Generate all three voting stages.
    pub fn new(trip_id: TripId, preferences: Preferences) -> Self {
        Self {
            trip_id,
            preferences,
            stages: Stage::VOTING.to_vec(),
        }
    }

    pub fn with_stages(mut self, stages: Vec<Stage>) -> Self {
        self.stages = stages;
        self
    }
}

#[derive(Debug, Clone)]
pub struct GenerateItemsOutput {
    pub trip: Trip,
    pub stages: Vec<StageGeneration>,
}

pub struct GenerateTripItemsUseCase {
    store: Arc<dyn TripStore>,
    generator: Arc<dyn ContentGenerator>,
    params: GenerationParams,
    activity_logger: Arc<dyn ActivityLogger>,
}

impl GenerateTripItemsUseCase {
    pub fn new(store: Arc<dyn TripStore>, generator: Arc<dyn ContentGenerator>) -> Self {
        Self {
            store,
            generator,
            params: GenerationParams::default(),
            activity_logger: Arc::new(NoActivityLogger),
        }
    }

    pub fn with_params(mut self, params: GenerationParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_activity_logger(mut self, logger: Arc<dyn ActivityLogger>) -> Self {
        self.activity_logger = logger;
        self
    }

    pub async fn execute(
        &self,
        input: GenerateItemsInput,
    ) -> Result<GenerateItemsOutput, GenerateItemsError> {
        if input.preferences.is_empty() {
            return Err(GenerateItemsError::NoPreferences);
        }

        let trip = self
            .store
            .get_trip(&input.trip_id)
            .await?
            .ok_or_else(|| GenerateItemsError::TripNotFound(input.trip_id.clone()))?;

        // Replacing items under existing votes would orphan them.
        if trip.current_stage != Stage::Destinations || self.store.count_votes(&trip.id).await? > 0
        {
            return Err(GenerateItemsError::ItemsLocked(trip.current_stage));
        }

        let stages: Vec<Stage> = input
            .stages
            .iter()
            .copied()
            .filter(|s| s.is_votable())
            .collect();
        info!(
            "Generating {} stage(s) for trip {} with {}",
            stages.len(),
            trip.id,
            self.generator.name()
        );

        let results = join_all(
            stages
                .iter()
                .map(|stage| self.generate_stage(&trip, &input.preferences, *stage)),
        )
        .await;

        let mut generated = Vec::with_capacity(results.len());
        for (stage, (details, source)) in stages.into_iter().zip(results) {
            let ai_generated = !source.is_fallback() && self.generator.is_ai();
            let items: Vec<VotableItem> = details
                .into_iter()
                .enumerate()
                .map(|(position, d)| {
                    VotableItem::new(trip.id.clone(), position, d).ai_generated(ai_generated)
                })
                .collect();

            self.store.replace_items(&trip.id, stage, &items).await?;
            self.activity_logger.log(ActivityEvent::new(
                "items_generated",
                json!({
                    "trip_id": trip.id.as_str(),
                    "stage": stage.as_str(),
                    "count": items.len(),
                    "fallback": source.is_fallback(),
                }),
            ));
            generated.push(StageGeneration {
                stage,
                items,
                source,
            });
        }

        Ok(GenerateItemsOutput {
            trip,
            stages: generated,
        })
    }

    async fn generate_stage(
        &self,
        trip: &Trip,
        preferences: &Preferences,
        stage: Stage,
    ) -> (Vec<ItemDetails>, ItemSource) {
        let count = self.params.count_for(stage);
        let departure = trip.departure_location.clone();
        let request = GenerationRequest::new(stage, count, trip.budget)
            .with_preferences(preferences.clone())
            .with_departure_location(departure.clone());

        let outcome = match self.generator.generate(&request).await {
            Ok(items) => {
                let items: Vec<ItemDetails> =
                    items.into_iter().filter(|d| d.stage() == stage).collect();
                if items.is_empty() {
                    Err(format!("generator returned no {stage} items"))
                } else {
                    Ok(items)
                }
            }
            Err(e) => Err(e.to_string()),
        };

        let (mut items, source) = match outcome {
            Ok(items) => (items, ItemSource::Generator(self.generator.name().to_string())),
            Err(reason) => {
                warn!("Using built-in {} list: {}", stage, reason);
                let departure = departure.as_deref().unwrap_or(DEFAULT_DEPARTURE);
                (fallback::for_stage(stage, departure), ItemSource::Fallback { reason })
            }
        };
        items.truncate(count);
        (items, source)
    }
}
