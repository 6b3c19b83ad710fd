//! Row storage shared by the store adapters
//!
//! [`TripTables`] holds every table in plain collections and implements the
//! write semantics (upsert by natural key, monotonic stage advance). The
//! adapters only add locking, persistence and change publication.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tripvote_application::StoreError;
use tripvote_domain::{
    ItemId, Participant, ParticipantId, Stage, Trip, TripId, VotableItem, Vote, VoteKey,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TripTables {
    trips: BTreeMap<TripId, Trip>,
    participants: Vec<Participant>,
    items: Vec<VotableItem>,
    votes: Vec<Vote>,
}

impl TripTables {
    pub fn insert_trip(&mut self, trip: &Trip) -> Result<(), StoreError> {
        if self.trips.contains_key(&trip.id) {
            return Err(StoreError::Rejected(format!("trip {} already exists", trip.id)));
        }
        self.trips.insert(trip.id.clone(), trip.clone());
        Ok(())
    }

    pub fn trip(&self, id: &TripId) -> Option<&Trip> {
        self.trips.get(id)
    }

    /// Compare-and-set: only a trip still at `from` moves, and only forward.
    pub fn advance_stage(&mut self, id: &TripId, from: Stage, to: Stage) -> Result<Stage, StoreError> {
        let trip = self
            .trips
            .get_mut(id)
            .ok_or_else(|| StoreError::trip_not_found(id))?;
        if trip.current_stage == from && to > from {
            trip.current_stage = to;
        }
        Ok(trip.current_stage)
    }

    pub fn add_participant(&mut self, participant: &Participant) -> Result<(), StoreError> {
        if !self.trips.contains_key(&participant.trip_id) {
            return Err(StoreError::trip_not_found(&participant.trip_id));
        }
        match self.participants.iter_mut().find(|p| p.id == participant.id) {
            Some(existing) => *existing = participant.clone(),
            None => self.participants.push(participant.clone()),
        }
        Ok(())
    }

    pub fn participants(&self, trip_id: &TripId) -> Vec<Participant> {
        self.participants
            .iter()
            .filter(|p| &p.trip_id == trip_id)
            .cloned()
            .collect()
    }

    pub fn participant(&self, trip_id: &TripId, id: &ParticipantId) -> Option<&Participant> {
        self.participants
            .iter()
            .find(|p| &p.trip_id == trip_id && &p.id == id)
    }

    pub fn set_stage_complete(
        &mut self,
        trip_id: &TripId,
        id: &ParticipantId,
        stage: Stage,
        done: bool,
    ) -> Result<(), StoreError> {
        let participant = self
            .participants
            .iter_mut()
            .find(|p| &p.trip_id == trip_id && &p.id == id)
            .ok_or_else(|| StoreError::participant_not_found(id))?;
        participant.flags.set(stage, done);
        Ok(())
    }

    pub fn replace_items(
        &mut self,
        trip_id: &TripId,
        stage: Stage,
        items: &[VotableItem],
    ) -> Result<(), StoreError> {
        if !self.trips.contains_key(trip_id) {
            return Err(StoreError::trip_not_found(trip_id));
        }
        if let Some(stray) = items
            .iter()
            .find(|item| &item.trip_id != trip_id || item.stage() != stage)
        {
            return Err(StoreError::Rejected(format!(
                "item {} does not belong to {} of trip {}",
                stray.id, stage, trip_id
            )));
        }
        self.items
            .retain(|item| !(&item.trip_id == trip_id && item.stage() == stage));
        self.items.extend(items.iter().cloned());
        Ok(())
    }

    pub fn items_for_stage(&self, trip_id: &TripId, stage: Stage) -> Vec<VotableItem> {
        let mut items: Vec<VotableItem> = self
            .items
            .iter()
            .filter(|item| &item.trip_id == trip_id && item.stage() == stage)
            .cloned()
            .collect();
        items.sort_by_key(|item| item.position);
        items
    }

    pub fn item(&self, trip_id: &TripId, id: &ItemId) -> Option<&VotableItem> {
        self.items
            .iter()
            .find(|item| &item.trip_id == trip_id && &item.id == id)
    }

    /// Insert or overwrite the vote with the same natural key.
    pub fn upsert_vote(&mut self, vote: &Vote) -> Result<(), StoreError> {
        let item = self.item(&vote.trip_id, &vote.item_id).ok_or_else(|| StoreError::NotFound {
            entity: "item",
            id: vote.item_id.to_string(),
        })?;
        if item.stage() != vote.stage {
            return Err(StoreError::Rejected(format!(
                "item {} is not a {} item",
                vote.item_id, vote.stage
            )));
        }
        if self.participant(&vote.trip_id, &vote.participant_id).is_none() {
            return Err(StoreError::participant_not_found(&vote.participant_id));
        }

        let key: VoteKey = vote.key();
        match self.votes.iter_mut().find(|v| v.key() == key) {
            Some(existing) => *existing = vote.clone(),
            None => self.votes.push(vote.clone()),
        }
        Ok(())
    }

    pub fn votes_for_stage(&self, trip_id: &TripId, stage: Stage) -> Vec<Vote> {
        self.votes
            .iter()
            .filter(|v| &v.trip_id == trip_id && v.stage == stage)
            .cloned()
            .collect()
    }

    pub fn votes_by_participant(
        &self,
        trip_id: &TripId,
        stage: Stage,
        participant: &ParticipantId,
    ) -> Vec<Vote> {
        self.votes
            .iter()
            .filter(|v| &v.trip_id == trip_id && v.stage == stage && &v.participant_id == participant)
            .cloned()
            .collect()
    }

    pub fn count_votes(&self, trip_id: &TripId) -> usize {
        self.votes.iter().filter(|v| &v.trip_id == trip_id).count()
    }
}
