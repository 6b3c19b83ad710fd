//! Trip store adapters
//!
//! [`TableStore`] implements every store port over [`TripTables`] and
//! publishes a [`ChangeEvent`] after each successful write. Where the rows
//! live between calls is decided by its [`Persistence`]:
//!
//! - [`InMemoryTripStore`]: process memory only
//! - [`JsonFileTripStore`]: a JSON snapshot shared by every process using the file

mod json_file;
mod memory;
mod tables;

#[cfg(test)]
mod scenarios;

pub use json_file::{JsonSnapshot, SnapshotLock};
pub use memory::Volatile;
pub use tables::TripTables;

use crate::realtime::{ChangeHub, FileWatch};
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::trace;
use tripvote_application::{
    ChangeEvent, ChangeFeed, ChangeKind, ChangeSubscription, ChangeTable, ItemCatalog,
    ParticipantRegistry, StoreError, TripRepository, VoteStore,
};
use tripvote_domain::{
    ItemId, Participant, ParticipantId, Stage, Trip, TripId, VotableItem, Vote,
};

/// Where [`TableStore`] keeps its rows between operations.
pub trait Persistence: Send + Sync + 'static {
    /// Held from refresh through persist of one write.
    type WriteLock;

    fn lock_for_write(&self) -> Result<Self::WriteLock, StoreError>;

    /// Fresh tables to operate on, or `None` to keep the in-process copy.
    fn refresh(&self) -> Result<Option<TripTables>, StoreError>;

    fn persist(&self, tables: &TripTables) -> Result<(), StoreError>;

    /// File to poll for writes made by other processes.
    fn watch(&self) -> Option<FileWatch>;
}

pub struct TableStore<P: Persistence> {
    tables: Mutex<TripTables>,
    persistence: P,
    hub: ChangeHub,
}

pub type InMemoryTripStore = TableStore<Volatile>;
pub type JsonFileTripStore = TableStore<JsonSnapshot>;

impl InMemoryTripStore {
    pub fn new() -> Self {
        Self::with_persistence(Volatile)
    }
}

impl Default for InMemoryTripStore {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonFileTripStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self::with_persistence(JsonSnapshot::new(path))
    }
}

impl<P: Persistence> TableStore<P> {
    pub fn with_persistence(persistence: P) -> Self {
        Self {
            tables: Mutex::new(TripTables::default()),
            persistence,
            hub: ChangeHub::new(),
        }
    }

    pub fn persistence(&self) -> &P {
        &self.persistence
    }

    fn read<R>(&self, f: impl FnOnce(&TripTables) -> R) -> Result<R, StoreError> {
        let mut tables = self
            .tables
            .lock()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".to_string()))?;
        if let Some(fresh) = self.persistence.refresh()? {
            *tables = fresh;
        }
        Ok(f(&tables))
    }

    /// Apply `f`, persist, then publish whatever events it reports.
    fn write<R>(
        &self,
        f: impl FnOnce(&mut TripTables) -> Result<(R, Vec<ChangeEvent>), StoreError>,
    ) -> Result<R, StoreError> {
        let (result, events) = {
            let mut tables = self
                .tables
                .lock()
                .map_err(|_| StoreError::Unavailable("store lock poisoned".to_string()))?;
            let _held = self.persistence.lock_for_write()?;
            if let Some(fresh) = self.persistence.refresh()? {
                *tables = fresh;
            }
            let (result, events) = f(&mut tables)?;
            if !events.is_empty() {
                self.persistence.persist(&tables)?;
            }
            (result, events)
        };

        for event in events {
            trace!("Publishing {} {:?} for {}", event.table, event.kind, event.trip_id);
            self.hub.publish(event);
        }
        Ok(result)
    }
}

#[async_trait]
impl<P: Persistence> TripRepository for TableStore<P> {
    async fn create_trip(&self, trip: &Trip) -> Result<(), StoreError> {
        self.write(|tables| {
            tables.insert_trip(trip)?;
            Ok((
                (),
                vec![ChangeEvent::new(trip.id.clone(), ChangeTable::Trip, ChangeKind::Insert)],
            ))
        })
    }

    async fn get_trip(&self, id: &TripId) -> Result<Option<Trip>, StoreError> {
        self.read(|tables| tables.trip(id).cloned())
    }

    async fn advance_stage(
        &self,
        id: &TripId,
        from: Stage,
        to: Stage,
    ) -> Result<Stage, StoreError> {
        self.write(|tables| {
            let before = tables
                .trip(id)
                .map(|trip| trip.current_stage)
                .ok_or_else(|| StoreError::trip_not_found(id))?;
            let after = tables.advance_stage(id, from, to)?;
            let events = if after != before {
                vec![ChangeEvent::new(id.clone(), ChangeTable::Trip, ChangeKind::Update)]
            } else {
                Vec::new()
            };
            Ok((after, events))
        })
    }
}

#[async_trait]
impl<P: Persistence> ParticipantRegistry for TableStore<P> {
    async fn add_participant(&self, participant: &Participant) -> Result<(), StoreError> {
        self.write(|tables| {
            let kind = if tables.participant(&participant.trip_id, &participant.id).is_some() {
                ChangeKind::Update
            } else {
                ChangeKind::Insert
            };
            tables.add_participant(participant)?;
            Ok((
                (),
                vec![ChangeEvent::new(
                    participant.trip_id.clone(),
                    ChangeTable::Participants,
                    kind,
                )],
            ))
        })
    }

    async fn participants(&self, trip_id: &TripId) -> Result<Vec<Participant>, StoreError> {
        self.read(|tables| tables.participants(trip_id))
    }

    async fn get_participant(
        &self,
        trip_id: &TripId,
        id: &ParticipantId,
    ) -> Result<Option<Participant>, StoreError> {
        self.read(|tables| tables.participant(trip_id, id).cloned())
    }

    async fn set_stage_complete(
        &self,
        trip_id: &TripId,
        id: &ParticipantId,
        stage: Stage,
        done: bool,
    ) -> Result<(), StoreError> {
        self.write(|tables| {
            tables.set_stage_complete(trip_id, id, stage, done)?;
            Ok((
                (),
                vec![ChangeEvent::new(
                    trip_id.clone(),
                    ChangeTable::Participants,
                    ChangeKind::Update,
                )],
            ))
        })
    }
}

#[async_trait]
impl<P: Persistence> ItemCatalog for TableStore<P> {
    async fn replace_items(
        &self,
        trip_id: &TripId,
        stage: Stage,
        items: &[VotableItem],
    ) -> Result<(), StoreError> {
        self.write(|tables| {
            tables.replace_items(trip_id, stage, items)?;
            Ok((
                (),
                vec![ChangeEvent::new(
                    trip_id.clone(),
                    ChangeTable::Items(stage),
                    ChangeKind::Insert,
                )],
            ))
        })
    }

    async fn items_for_stage(
        &self,
        trip_id: &TripId,
        stage: Stage,
    ) -> Result<Vec<VotableItem>, StoreError> {
        self.read(|tables| tables.items_for_stage(trip_id, stage))
    }

    async fn get_item(
        &self,
        trip_id: &TripId,
        id: &ItemId,
    ) -> Result<Option<VotableItem>, StoreError> {
        self.read(|tables| tables.item(trip_id, id).cloned())
    }
}

#[async_trait]
impl<P: Persistence> VoteStore for TableStore<P> {
    async fn upsert_vote(&self, vote: &Vote) -> Result<(), StoreError> {
        self.write(|tables| {
            let kind = if tables
                .votes_by_participant(&vote.trip_id, vote.stage, &vote.participant_id)
                .iter()
                .any(|v| v.item_id == vote.item_id)
            {
                ChangeKind::Update
            } else {
                ChangeKind::Insert
            };
            tables.upsert_vote(vote)?;
            Ok((
                (),
                vec![ChangeEvent::new(
                    vote.trip_id.clone(),
                    ChangeTable::Votes(vote.stage),
                    kind,
                )],
            ))
        })
    }

    async fn votes_for_stage(
        &self,
        trip_id: &TripId,
        stage: Stage,
    ) -> Result<Vec<Vote>, StoreError> {
        self.read(|tables| tables.votes_for_stage(trip_id, stage))
    }

    async fn votes_by_participant(
        &self,
        trip_id: &TripId,
        stage: Stage,
        participant: &ParticipantId,
    ) -> Result<Vec<Vote>, StoreError> {
        self.read(|tables| tables.votes_by_participant(trip_id, stage, participant))
    }

    async fn count_votes(&self, trip_id: &TripId) -> Result<usize, StoreError> {
        self.read(|tables| tables.count_votes(trip_id))
    }
}

#[async_trait]
impl<P: Persistence> ChangeFeed for TableStore<P> {
    async fn subscribe(&self, trip_id: &TripId) -> Result<ChangeSubscription, StoreError> {
        Ok(self.hub.subscribe(trip_id, self.persistence.watch()))
    }
}
