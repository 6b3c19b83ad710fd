//! Realtime change feed port
//!
//! Row-level change notifications scoped to one trip. The aggregator treats
//! every event as a hint to reload authoritative state, so adapters may
//! coalesce, duplicate or reorder events freely.

use async_trait::async_trait;
use tokio::sync::mpsc;
use tripvote_domain::{Stage, TripId};

use super::store::StoreError;

/// Table a change was observed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeTable {
    /// One of the three per-stage vote tables
    Votes(Stage),
    Participants,
    Items(Stage),
    Trip,
}

impl ChangeTable {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeTable::Votes(Stage::Destinations) => "destination_votes",
            ChangeTable::Votes(Stage::Accommodations) => "accommodation_votes",
            ChangeTable::Votes(_) => "transportation_votes",
            ChangeTable::Participants => "trip_participants",
            ChangeTable::Items(Stage::Destinations) => "destinations",
            ChangeTable::Items(Stage::Accommodations) => "accommodations",
            ChangeTable::Items(_) => "transportation",
            ChangeTable::Trip => "trips",
        }
    }
}

impl std::fmt::Display for ChangeTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

/// A single row-level change notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub trip_id: TripId,
    pub table: ChangeTable,
    pub kind: ChangeKind,
}

impl ChangeEvent {
    pub fn new(trip_id: TripId, table: ChangeTable, kind: ChangeKind) -> Self {
        Self {
            trip_id,
            table,
            kind,
        }
    }

    /// Synthetic event used when the feed had to drop notifications.
    pub fn resync(trip_id: TripId) -> Self {
        Self::new(trip_id, ChangeTable::Trip, ChangeKind::Update)
    }
}

/// Receiving half of a trip subscription.
///
/// Dropping the subscription unsubscribes.
pub struct ChangeSubscription {
    receiver: mpsc::Receiver<ChangeEvent>,
}

impl ChangeSubscription {
    pub fn new(receiver: mpsc::Receiver<ChangeEvent>) -> Self {
        Self { receiver }
    }

    /// Next event, or `None` once the feed has shut down.
    pub async fn next(&mut self) -> Option<ChangeEvent> {
        self.receiver.recv().await
    }

    /// Drain everything already queued without waiting.
    pub fn drain(&mut self) -> Vec<ChangeEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.receiver.try_recv() {
            events.push(event);
        }
        events
    }
}

/// Source of change notifications
#[async_trait]
pub trait ChangeFeed: Send + Sync {
    /// Subscribe to changes on every table that belongs to `trip_id`.
    async fn subscribe(&self, trip_id: &TripId) -> Result<ChangeSubscription, StoreError>;
}
