//! Trip and participant entities

use crate::core::error::DomainError;
use crate::core::ids::{AccountId, ParticipantId, TripId};
use crate::trip::budget::BudgetTier;
use crate::trip::stage::Stage;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A group trip (Entity)
///
/// Created once by its creator and afterwards only mutated through
/// `current_stage`, which moves forward until [`Stage::Completed`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    pub id: TripId,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub budget: BudgetTier,
    pub current_stage: Stage,
    /// Account of the creator, when the creator is signed in
    pub creator: Option<AccountId>,
    /// Where the group departs from (used for transportation options)
    pub departure_location: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Trip {
    /// Validate the inputs and build a trip at [`Stage::Destinations`].
    pub fn new(
        name: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
        budget: BudgetTier,
    ) -> Result<Self, DomainError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(DomainError::EmptyTripName);
        }
        if end_date < start_date {
            return Err(DomainError::InvalidDateRange {
                start: start_date.to_string(),
                end: end_date.to_string(),
            });
        }

        Ok(Self {
            id: TripId::generate(),
            name,
            start_date,
            end_date,
            budget,
            current_stage: Stage::Destinations,
            creator: None,
            departure_location: None,
            created_at: Utc::now(),
        })
    }

    pub fn with_creator(mut self, account: AccountId) -> Self {
        self.creator = Some(account);
        self
    }

    pub fn with_departure_location(mut self, location: impl Into<String>) -> Self {
        self.departure_location = Some(location.into());
        self
    }

    /// Number of nights between start and end date.
    pub fn nights(&self) -> i64 {
        (self.end_date - self.start_date).num_days()
    }

    pub fn is_completed(&self) -> bool {
        self.current_stage == Stage::Completed
    }
}

/// Per-stage completion flags of a participant.
///
/// Each flag is true exactly when the participant has a vote on every item
/// of that stage's item set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StageFlags {
    pub destinations: bool,
    pub accommodations: bool,
    pub transportation: bool,
}

impl StageFlags {
    /// Flag for `stage`. `Completed` counts as done.
    pub fn get(&self, stage: Stage) -> bool {
        match stage {
            Stage::Destinations => self.destinations,
            Stage::Accommodations => self.accommodations,
            Stage::Transportation => self.transportation,
            Stage::Completed => true,
        }
    }

    /// Set the flag for `stage`. Setting `Completed` is a no-op.
    pub fn set(&mut self, stage: Stage, done: bool) {
        match stage {
            Stage::Destinations => self.destinations = done,
            Stage::Accommodations => self.accommodations = done,
            Stage::Transportation => self.transportation = done,
            Stage::Completed => {}
        }
    }
}

/// A person taking part in a trip (Entity)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub trip_id: TripId,
    pub name: String,
    pub account: Option<AccountId>,
    pub flags: StageFlags,
    pub joined_at: DateTime<Utc>,
}

impl Participant {
    pub fn new(trip_id: TripId, name: impl Into<String>) -> Result<Self, DomainError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(DomainError::EmptyDisplayName);
        }

        Ok(Self {
            id: ParticipantId::generate(),
            trip_id,
            name,
            account: None,
            flags: StageFlags::default(),
            joined_at: Utc::now(),
        })
    }

    pub fn with_account(mut self, account: AccountId) -> Self {
        self.account = Some(account);
        self
    }

    pub fn has_completed(&self, stage: Stage) -> bool {
        self.flags.get(stage)
    }

    /// Whether this row represents the given account or anonymous name.
    ///
    /// Accounts match exactly. Anonymous rows match on a case-insensitive name.
    pub fn matches_identity(&self, account: Option<&AccountId>, name: &str) -> bool {
        match (account, &self.account) {
            (Some(wanted), Some(own)) => wanted == own,
            (Some(_), None) | (None, Some(_)) => false,
            (None, None) => self.name.eq_ignore_ascii_case(name.trim()),
        }
    }
}
