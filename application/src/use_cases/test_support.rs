//! Shared port doubles for use case tests.

use crate::ports::realtime::{ChangeEvent, ChangeFeed, ChangeKind, ChangeSubscription, ChangeTable};
use crate::ports::store::{ItemCatalog, ParticipantRegistry, StoreError, TripRepository, VoteStore};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::mpsc;
use tripvote_domain::{
    BudgetTier, ItemDetails, ItemId, Participant, ParticipantId, Stage, TierPrices, Trip, TripId,
    VotableItem, Vote, VoteKey,
};

#[derive(Default)]
struct State {
    trips: HashMap<TripId, Trip>,
    participants: Vec<Participant>,
    items: Vec<VotableItem>,
    votes: HashMap<VoteKey, Vote>,
}

/// In-memory store with failure switches. Every mutation is published to
/// subscribers of its trip.
#[derive(Default)]
pub(crate) struct MockStore {
    state: Mutex<State>,
    subscribers: Mutex<Vec<(TripId, mpsc::Sender<ChangeEvent>)>>,
    pub fail_vote_writes: AtomicBool,
    pub fail_flag_writes: AtomicBool,
    pub vote_writes: AtomicUsize,
    pub advance_writes: AtomicUsize,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn publish(&self, trip_id: &TripId, table: ChangeTable, kind: ChangeKind) {
        let subscribers = self.subscribers.lock().unwrap();
        for (trip, tx) in subscribers.iter() {
            if trip == trip_id {
                let _ = tx.try_send(ChangeEvent::new(trip_id.clone(), table, kind));
            }
        }
    }

    pub fn seed_trip(&self) -> Trip {
        let trip = Trip::new(
            "Summer",
            NaiveDate::from_ymd_opt(2026, 7, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 7, 8).unwrap(),
            BudgetTier::MidRange,
        )
        .unwrap();
        self.state
            .lock()
            .unwrap()
            .trips
            .insert(trip.id.clone(), trip.clone());
        trip
    }

    pub fn seed_trip_from(&self, departure: &str) -> Trip {
        let trip = self.seed_trip().with_departure_location(departure);
        self.state
            .lock()
            .unwrap()
            .trips
            .insert(trip.id.clone(), trip.clone());
        trip
    }

    pub fn seed_participant(&self, trip: &Trip, name: &str) -> Participant {
        let participant = Participant::new(trip.id.clone(), name).unwrap();
        self.state
            .lock()
            .unwrap()
            .participants
            .push(participant.clone());
        participant
    }

    pub fn seed_items(&self, trip: &Trip, stage: Stage, count: usize) -> Vec<VotableItem> {
        let items: Vec<VotableItem> = (0..count)
            .map(|i| {
                VotableItem::new(trip.id.clone(), i, details(stage, &format!("{stage}-{i}")))
                    .with_id(ItemId::new(format!("{}-{i}", stage.as_str())))
            })
            .collect();
        self.state.lock().unwrap().items.extend(items.clone());
        items
    }

    pub fn seed_vote(&self, vote: Vote) {
        self.state.lock().unwrap().votes.insert(vote.key(), vote);
    }

    pub fn trip(&self, id: &TripId) -> Trip {
        self.state.lock().unwrap().trips[id].clone()
    }

    pub fn participant(&self, id: &ParticipantId) -> Participant {
        self.state
            .lock()
            .unwrap()
            .participants
            .iter()
            .find(|p| &p.id == id)
            .cloned()
            .unwrap()
    }

    pub fn set_stage_complete_sync(&self, trip_id: &TripId, id: &ParticipantId, stage: Stage) {
        let mut state = self.state.lock().unwrap();
        if let Some(participant) = state
            .participants
            .iter_mut()
            .find(|p| &p.trip_id == trip_id && &p.id == id)
        {
            participant.flags.set(stage, true);
        }
    }

    pub fn vote_count(&self) -> usize {
        self.state.lock().unwrap().votes.len()
    }
}

pub(crate) fn details(stage: Stage, name: &str) -> ItemDetails {
    let costs = TierPrices::new(100.0, 200.0, 300.0);
    match stage {
        Stage::Accommodations => ItemDetails::Accommodation {
            name: name.to_string(),
            category: "Hotel".to_string(),
            location: "Center".to_string(),
            description: None,
            image_url: None,
            amenities: vec![],
            rating: None,
            nightly: costs,
        },
        Stage::Transportation => ItemDetails::Transportation {
            mode: "Train".to_string(),
            provider: name.to_string(),
            departure_location: "A".to_string(),
            arrival_location: "B".to_string(),
            departure_time: None,
            arrival_time: None,
            duration_minutes: None,
            description: None,
            fares: costs,
        },
        _ => ItemDetails::Destination {
            name: name.to_string(),
            country: "Nowhere".to_string(),
            description: None,
            image_url: None,
            best_time_to_visit: None,
            highlights: vec![],
            costs,
        },
    }
}

#[async_trait]
impl TripRepository for MockStore {
    async fn create_trip(&self, trip: &Trip) -> Result<(), StoreError> {
        self.state
            .lock()
            .unwrap()
            .trips
            .insert(trip.id.clone(), trip.clone());
        self.publish(&trip.id, ChangeTable::Trip, ChangeKind::Insert);
        Ok(())
    }

    async fn get_trip(&self, id: &TripId) -> Result<Option<Trip>, StoreError> {
        Ok(self.state.lock().unwrap().trips.get(id).cloned())
    }

    async fn advance_stage(&self, id: &TripId, from: Stage, to: Stage) -> Result<Stage, StoreError> {
        let stage = {
            let mut state = self.state.lock().unwrap();
            let trip = state
                .trips
                .get_mut(id)
                .ok_or_else(|| StoreError::trip_not_found(id))?;
            if trip.current_stage == from && to > from {
                trip.current_stage = to;
                self.advance_writes.fetch_add(1, Ordering::SeqCst);
            }
            trip.current_stage
        };
        self.publish(id, ChangeTable::Trip, ChangeKind::Update);
        Ok(stage)
    }
}

#[async_trait]
impl ParticipantRegistry for MockStore {
    async fn add_participant(&self, participant: &Participant) -> Result<(), StoreError> {
        self.state
            .lock()
            .unwrap()
            .participants
            .push(participant.clone());
        self.publish(&participant.trip_id, ChangeTable::Participants, ChangeKind::Insert);
        Ok(())
    }

    async fn participants(&self, trip_id: &TripId) -> Result<Vec<Participant>, StoreError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .participants
            .iter()
            .filter(|p| &p.trip_id == trip_id)
            .cloned()
            .collect())
    }

    async fn get_participant(
        &self,
        trip_id: &TripId,
        id: &ParticipantId,
    ) -> Result<Option<Participant>, StoreError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .participants
            .iter()
            .find(|p| &p.trip_id == trip_id && &p.id == id)
            .cloned())
    }

    async fn set_stage_complete(
        &self,
        trip_id: &TripId,
        id: &ParticipantId,
        stage: Stage,
        done: bool,
    ) -> Result<(), StoreError> {
        if self.fail_flag_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("flag write failed".to_string()));
        }
        {
            let mut state = self.state.lock().unwrap();
            let participant = state
                .participants
                .iter_mut()
                .find(|p| &p.trip_id == trip_id && &p.id == id)
                .ok_or_else(|| StoreError::participant_not_found(id))?;
            participant.flags.set(stage, done);
        }
        self.publish(trip_id, ChangeTable::Participants, ChangeKind::Update);
        Ok(())
    }
}

#[async_trait]
impl ItemCatalog for MockStore {
    async fn replace_items(
        &self,
        trip_id: &TripId,
        stage: Stage,
        items: &[VotableItem],
    ) -> Result<(), StoreError> {
        {
            let mut state = self.state.lock().unwrap();
            state
                .items
                .retain(|item| !(&item.trip_id == trip_id && item.stage() == stage));
            state.items.extend(items.iter().cloned());
        }
        self.publish(trip_id, ChangeTable::Items(stage), ChangeKind::Insert);
        Ok(())
    }

    async fn items_for_stage(
        &self,
        trip_id: &TripId,
        stage: Stage,
    ) -> Result<Vec<VotableItem>, StoreError> {
        let mut items: Vec<VotableItem> = self
            .state
            .lock()
            .unwrap()
            .items
            .iter()
            .filter(|item| &item.trip_id == trip_id && item.stage() == stage)
            .cloned()
            .collect();
        items.sort_by_key(|item| item.position);
        Ok(items)
    }

    async fn get_item(
        &self,
        trip_id: &TripId,
        id: &ItemId,
    ) -> Result<Option<VotableItem>, StoreError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .items
            .iter()
            .find(|item| &item.trip_id == trip_id && &item.id == id)
            .cloned())
    }
}

#[async_trait]
impl VoteStore for MockStore {
    async fn upsert_vote(&self, vote: &Vote) -> Result<(), StoreError> {
        if self.fail_vote_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("vote write failed".to_string()));
        }
        self.vote_writes.fetch_add(1, Ordering::SeqCst);
        self.state
            .lock()
            .unwrap()
            .votes
            .insert(vote.key(), vote.clone());
        self.publish(&vote.trip_id, ChangeTable::Votes(vote.stage), ChangeKind::Insert);
        Ok(())
    }

    async fn votes_for_stage(&self, trip_id: &TripId, stage: Stage) -> Result<Vec<Vote>, StoreError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .votes
            .values()
            .filter(|v| &v.trip_id == trip_id && v.stage == stage)
            .cloned()
            .collect())
    }

    async fn votes_by_participant(
        &self,
        trip_id: &TripId,
        stage: Stage,
        participant: &ParticipantId,
    ) -> Result<Vec<Vote>, StoreError> {
        Ok(self
            .votes_for_stage(trip_id, stage)
            .await?
            .into_iter()
            .filter(|v| &v.participant_id == participant)
            .collect())
    }

    async fn count_votes(&self, trip_id: &TripId) -> Result<usize, StoreError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .votes
            .values()
            .filter(|v| &v.trip_id == trip_id)
            .count())
    }
}

#[async_trait]
impl ChangeFeed for MockStore {
    async fn subscribe(&self, trip_id: &TripId) -> Result<ChangeSubscription, StoreError> {
        let (tx, rx) = mpsc::channel(256);
        self.subscribers
            .lock()
            .unwrap()
            .push((trip_id.clone(), tx));
        Ok(ChangeSubscription::new(rx))
    }
}
