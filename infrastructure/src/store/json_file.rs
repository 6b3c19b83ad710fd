//! JSON snapshot persistence
//!
//! The whole store is one JSON document. Every operation reloads it so
//! several CLI processes can share a file. Writers serialize on an exclusive
//! lock of a sidecar `.lock` file held from reload through persist, and each
//! write goes through its own temporary file and a rename so readers never
//! see a half-written snapshot.

use super::Persistence;
use super::tables::TripTables;
use crate::realtime::FileWatch;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;
use tripvote_application::StoreError;
use uuid::Uuid;

const SNAPSHOT_VERSION: u32 = 1;
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Serialize, Deserialize)]
struct Snapshot {
    version: u32,
    tables: TripTables,
}

#[derive(Debug, Clone)]
pub struct JsonSnapshot {
    path: PathBuf,
    poll_interval: Duration,
}

impl JsonSnapshot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn lock_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".lock");
        PathBuf::from(name)
    }

    fn unavailable(&self, e: std::io::Error) -> StoreError {
        StoreError::Unavailable(format!("{}: {}", self.path.display(), e))
    }

    fn ensure_parent(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| self.unavailable(e))?;
        }
        Ok(())
    }

    /// Block until no other writer holds the snapshot.
    fn acquire(&self) -> Result<SnapshotLock, StoreError> {
        self.ensure_parent()?;
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(self.lock_path())
            .map_err(|e| self.unavailable(e))?;
        file.lock().map_err(|e| self.unavailable(e))?;
        Ok(SnapshotLock { file })
    }

    fn load(&self) -> Result<TripTables, StoreError> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(TripTables::default()),
            Err(e) => {
                return Err(StoreError::Unavailable(format!(
                    "{}: {}",
                    self.path.display(),
                    e
                )));
            }
        };

        let snapshot: Snapshot = serde_json::from_str(&text)
            .map_err(|e| StoreError::Corrupt(format!("{}: {}", self.path.display(), e)))?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(StoreError::Corrupt(format!(
                "{}: unsupported snapshot version {}",
                self.path.display(),
                snapshot.version
            )));
        }
        Ok(snapshot.tables)
    }

    fn save(&self, tables: &TripTables) -> Result<(), StoreError> {
        self.ensure_parent()?;

        let snapshot = Snapshot {
            version: SNAPSHOT_VERSION,
            tables: tables.clone(),
        };
        let json = serde_json::to_string_pretty(&snapshot)
            .map_err(|e| StoreError::Corrupt(e.to_string()))?;

        let file_name = self
            .path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("snapshot");
        let tmp = self
            .path
            .with_file_name(format!(".{}.{}.tmp", file_name, Uuid::new_v4().simple()));

        let written = std::fs::write(&tmp, json).and_then(|()| std::fs::rename(&tmp, &self.path));
        if let Err(e) = written {
            let _ = std::fs::remove_file(&tmp);
            return Err(self.unavailable(e));
        }
        debug!("Saved snapshot to {}", self.path.display());
        Ok(())
    }
}

/// Exclusive hold on a snapshot's lock file. Released on drop.
#[derive(Debug)]
pub struct SnapshotLock {
    file: File,
}

impl Drop for SnapshotLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}

impl Persistence for JsonSnapshot {
    type WriteLock = SnapshotLock;

    fn lock_for_write(&self) -> Result<SnapshotLock, StoreError> {
        self.acquire()
    }

    fn refresh(&self) -> Result<Option<TripTables>, StoreError> {
        self.load().map(Some)
    }

    fn persist(&self, tables: &TripTables) -> Result<(), StoreError> {
        self.save(tables)
    }

    fn watch(&self) -> Option<FileWatch> {
        Some(FileWatch {
            path: self.path.clone(),
            interval: self.poll_interval,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = JsonSnapshot::new(dir.path().join("none.json"));
        assert_eq!(snapshot.load().unwrap(), TripTables::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = JsonSnapshot::new(dir.path().join("deep").join("trips.json"));

        snapshot.save(&TripTables::default()).unwrap();

        assert!(snapshot.path().exists());
        assert_eq!(snapshot.load().unwrap(), TripTables::default());
        let leftovers: Vec<_> = std::fs::read_dir(dir.path().join("deep"))
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .filter(|name| name.to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_failed_rename_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trips.json");
        // A directory in the snapshot's place makes the rename fail.
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("keep"), "x").unwrap();

        let error = JsonSnapshot::new(&path)
            .save(&TripTables::default())
            .unwrap_err();

        assert!(matches!(error, StoreError::Unavailable(_)));
        let names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["trips.json".to_string()]);
    }

    #[test]
    fn test_write_lock_is_exclusive_between_handles() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = JsonSnapshot::new(dir.path().join("trips.json"));

        let held = snapshot.lock_for_write().unwrap();
        let other = File::options()
            .write(true)
            .open(snapshot.lock_path())
            .unwrap();
        assert!(other.try_lock().is_err());

        drop(held);
        assert!(other.try_lock().is_ok());
    }

    #[test]
    fn test_garbage_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trips.json");
        std::fs::write(&path, "not json").unwrap();

        let error = JsonSnapshot::new(&path).load().unwrap_err();
        assert!(matches!(error, StoreError::Corrupt(_)));
        assert!(!error.is_transient());
    }

    #[test]
    fn test_unknown_version_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trips.json");
        std::fs::write(&path, r#"{"version": 99, "tables": {}}"#).unwrap();

        assert!(matches!(
            JsonSnapshot::new(&path).load(),
            Err(StoreError::Corrupt(_))
        ));
    }
}
