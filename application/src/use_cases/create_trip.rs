//! Create trip use case

use crate::ports::activity_logger::{ActivityEvent, ActivityLogger, NoActivityLogger};
use crate::ports::store::{StoreError, TripStore};
use chrono::NaiveDate;
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;
use tripvote_domain::{AccountId, BudgetTier, DomainError, Participant, Trip};

/// Name given to the creator when none is supplied
const DEFAULT_CREATOR_NAME: &str = "Creator";

#[derive(Error, Debug)]
pub enum CreateTripError {
    #[error("Invalid trip: {0}")]
    Invalid(#[from] DomainError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone)]
pub struct CreateTripInput {
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub budget: BudgetTier,
    pub creator_name: String,
    pub creator_account: Option<AccountId>,
    pub departure_location: Option<String>,
}

impl CreateTripInput {
    pub fn new(
        name: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
        budget: BudgetTier,
    ) -> Self {
        Self {
            name: name.into(),
            start_date,
            end_date,
            budget,
            creator_name: String::new(),
            creator_account: None,
            departure_location: None,
        }
    }

    pub fn with_creator(mut self, name: impl Into<String>, account: Option<AccountId>) -> Self {
        self.creator_name = name.into();
        self.creator_account = account;
        self
    }

    pub fn with_departure_location(mut self, location: impl Into<String>) -> Self {
        self.departure_location = Some(location.into());
        self
    }
}

#[derive(Debug, Clone)]
pub struct CreateTripOutput {
    pub trip: Trip,
    /// The creator, registered as the first participant
    pub creator: Participant,
}

pub struct CreateTripUseCase {
    store: Arc<dyn TripStore>,
    activity_logger: Arc<dyn ActivityLogger>,
}

impl CreateTripUseCase {
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

    pub async fn execute(&self, input: CreateTripInput) -> Result<CreateTripOutput, CreateTripError> {
        let mut trip = Trip::new(&input.name, input.start_date, input.end_date, input.budget)?;
        if let Some(account) = &input.creator_account {
            trip = trip.with_creator(account.clone());
        }
        if let Some(location) = input
            .departure_location
            .as_deref()
            .filter(|l| !l.trim().is_empty())
        {
            trip = trip.with_departure_location(location.trim());
        }

        let creator_name = match input.creator_name.trim() {
            "" => DEFAULT_CREATOR_NAME,
            name => name,
        };
        let mut creator = Participant::new(trip.id.clone(), creator_name)?;
        if let Some(account) = input.creator_account {
            creator = creator.with_account(account);
        }

        self.store.create_trip(&trip).await?;
        self.store.add_participant(&creator).await?;

        info!("Created trip {} ({})", trip.name, trip.id);
        self.activity_logger.log(ActivityEvent::new(
            "trip_created",
            json!({
                "trip_id": trip.id.as_str(),
                "name": trip.name,
                "budget": trip.budget.symbol(),
                "nights": trip.nights(),
            }),
        ));

        Ok(CreateTripOutput { trip, creator })
    }
}
