//! Join trip use case
//!
//! Resolves a share link (or bare trip id) and registers the caller as a
//! participant. Joining twice with the same identity returns the existing
//! participant.

use crate::ports::activity_logger::{ActivityEvent, ActivityLogger, NoActivityLogger};
use crate::ports::store::{StoreError, TripStore};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};
use tripvote_domain::{AccountId, DomainError, Participant, ShareLink, Trip, TripId};

#[derive(Error, Debug)]
pub enum JoinTripError {
    #[error("Trip not found: {0}")]
    NotFound(TripId),

    #[error(transparent)]
    Invalid(#[from] DomainError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl JoinTripError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, JoinTripError::NotFound(_))
    }
}

#[derive(Debug, Clone)]
pub struct JoinTripInput {
    /// Share link or trip id
    pub link: String,
    pub name: String,
    pub account: Option<AccountId>,
}

impl JoinTripInput {
    pub fn new(link: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            link: link.into(),
            name: name.into(),
            account: None,
        }
    }

    pub fn with_account(mut self, account: AccountId) -> Self {
        self.account = Some(account);
        self
    }
}

#[derive(Debug, Clone)]
pub struct JoinTripOutput {
    pub trip: Trip,
    pub participant: Participant,
    /// False when an existing participant matched the identity
    pub newly_joined: bool,
}

pub struct JoinTripUseCase {
    store: Arc<dyn TripStore>,
    activity_logger: Arc<dyn ActivityLogger>,
}

impl JoinTripUseCase {
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

    pub async fn execute(&self, input: JoinTripInput) -> Result<JoinTripOutput, JoinTripError> {
        let link = ShareLink::parse(&input.link)?;
        let trip_id = link.trip_id();
        let trip = self
            .store
            .get_trip(trip_id)
            .await?
            .ok_or_else(|| JoinTripError::NotFound(trip_id.clone()))?;

        let existing = self
            .store
            .participants(trip_id)
            .await?
            .into_iter()
            .find(|p| p.matches_identity(input.account.as_ref(), &input.name));
        if let Some(participant) = existing {
            debug!("{} already joined trip {}", participant.name, trip_id);
            return Ok(JoinTripOutput {
                trip,
                participant,
                newly_joined: false,
            });
        }

        let mut participant = Participant::new(trip_id.clone(), &input.name)?;
        if let Some(account) = input.account {
            participant = participant.with_account(account);
        }
        self.store.add_participant(&participant).await?;

        info!("{} joined trip {}", participant.name, trip.name);
        self.activity_logger.log(ActivityEvent::new(
            "participant_joined",
            json!({
                "trip_id": trip_id.as_str(),
                "participant_id": participant.id.as_str(),
                "name": participant.name,
                "stage": trip.current_stage.as_str(),
            }),
        ));

        Ok(JoinTripOutput {
            trip,
            participant,
            newly_joined: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::store::{ParticipantRegistry, TripRepository};
    use crate::use_cases::test_support::MockStore;
    use tripvote_domain::Stage;

    #[tokio::test]
    async fn test_join_by_share_link() {
        let store = Arc::new(MockStore::new());
        let trip = store.seed_trip();
        let link = ShareLink::new("https://tripvote.app", trip.id.clone()).to_url();

        let output = JoinTripUseCase::new(store.clone())
            .execute(JoinTripInput::new(link, "Ben"))
            .await
            .unwrap();

        assert!(output.newly_joined);
        assert_eq!(output.trip.id, trip.id);
        assert_eq!(store.participants(&trip.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_rejoin_same_name_is_deduplicated() {
        let store = Arc::new(MockStore::new());
        let trip = store.seed_trip();
        let use_case = JoinTripUseCase::new(store.clone());

        let first = use_case
            .execute(JoinTripInput::new(trip.id.as_str(), "Ben"))
            .await
            .unwrap();
        let second = use_case
            .execute(JoinTripInput::new(trip.id.as_str(), "ben "))
            .await
            .unwrap();

        assert!(!second.newly_joined);
        assert_eq!(first.participant.id, second.participant.id);
        assert_eq!(store.participants(&trip.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_same_name_different_account_joins_separately() {
        let store = Arc::new(MockStore::new());
        let trip = store.seed_trip();
        let use_case = JoinTripUseCase::new(store.clone());

        use_case
            .execute(JoinTripInput::new(trip.id.as_str(), "Sam").with_account(AccountId::new("a")))
            .await
            .unwrap();
        let second = use_case
            .execute(JoinTripInput::new(trip.id.as_str(), "Sam").with_account(AccountId::new("b")))
            .await
            .unwrap();

        assert!(second.newly_joined);
        assert_eq!(store.participants(&trip.id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_unknown_trip_is_not_found() {
        let store = Arc::new(MockStore::new());
        let error = JoinTripUseCase::new(store)
            .execute(JoinTripInput::new("https://tripvote.app/trip/nope", "Ben"))
            .await
            .unwrap_err();
        assert!(error.is_not_found());
    }

    #[tokio::test]
    async fn test_join_completed_trip_allowed() {
        let store = Arc::new(MockStore::new());
        let trip = store.seed_trip();
        for (from, to) in [
            (Stage::Destinations, Stage::Accommodations),
            (Stage::Accommodations, Stage::Transportation),
            (Stage::Transportation, Stage::Completed),
        ] {
            store.advance_stage(&trip.id, from, to).await.unwrap();
        }

        let output = JoinTripUseCase::new(store)
            .execute(JoinTripInput::new(trip.id.as_str(), "Late"))
            .await
            .unwrap();
        assert!(output.trip.is_completed());
    }

    #[tokio::test]
    async fn test_blank_name_rejected() {
        let store = Arc::new(MockStore::new());
        let trip = store.seed_trip();
        let error = JoinTripUseCase::new(store)
            .execute(JoinTripInput::new(trip.id.as_str(), "   "))
            .await
            .unwrap_err();
        assert!(matches!(
            error,
            JoinTripError::Invalid(DomainError::EmptyDisplayName)
        ));
    }
}
