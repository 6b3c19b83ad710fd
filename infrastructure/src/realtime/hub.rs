//! In-process change fan-out
//!
//! Store adapters publish every mutation to a [`ChangeHub`]. Each
//! subscription gets its own forwarding task that filters by trip and, for
//! file-backed stores, also polls the snapshot file so writes made by other
//! processes surface as resync events.

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, warn};
use tripvote_application::{ChangeEvent, ChangeSubscription};
use tripvote_domain::TripId;

const HUB_CAPACITY: usize = 256;
const SUBSCRIPTION_BUFFER: usize = 64;

/// File to watch for out-of-process writes
#[derive(Debug, Clone)]
pub struct FileWatch {
    pub path: PathBuf,
    pub interval: Duration,
}

pub struct ChangeHub {
    sender: broadcast::Sender<ChangeEvent>,
}

impl Default for ChangeHub {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeHub {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(HUB_CAPACITY);
        Self { sender }
    }

    /// Publish to current subscribers. Nobody listening is not an error.
    pub fn publish(&self, event: ChangeEvent) {
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self, trip_id: &TripId, watch: Option<FileWatch>) -> ChangeSubscription {
        let receiver = self.sender.subscribe();
        let (tx, rx) = mpsc::channel(SUBSCRIPTION_BUFFER);
        tokio::spawn(forward(receiver, tx, trip_id.clone(), watch));
        ChangeSubscription::new(rx)
    }
}

fn modified(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}

async fn forward(
    mut receiver: broadcast::Receiver<ChangeEvent>,
    tx: mpsc::Sender<ChangeEvent>,
    trip_id: TripId,
    watch: Option<FileWatch>,
) {
    let mut last_seen = watch.as_ref().and_then(|w| modified(&w.path));
    let period = watch
        .as_ref()
        .map(|w| w.interval)
        .unwrap_or(Duration::from_secs(3600));
    let mut ticker = tokio::time::interval(period);

    loop {
        let event = tokio::select! {
            received = receiver.recv() => match received {
                Ok(event) if event.trip_id == trip_id => event,
                Ok(_) => continue,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!("Change feed lagged by {} events, resyncing", skipped);
                    ChangeEvent::resync(trip_id.clone())
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
            _ = ticker.tick() => {
                let Some(watch) = &watch else { continue };
                let current = modified(&watch.path);
                if current == last_seen {
                    continue;
                }
                last_seen = current;
                debug!("{} changed on disk", watch.path.display());
                ChangeEvent::resync(trip_id.clone())
            }
        };

        if tx.send(event).await.is_err() {
            break;
        }
    }
}
