//! Volatile persistence: tables live only as long as the process.

use super::Persistence;
use super::tables::TripTables;
use crate::realtime::FileWatch;
use tripvote_application::StoreError;

#[derive(Debug, Default, Clone, Copy)]
pub struct Volatile;

impl Persistence for Volatile {
    type WriteLock = ();

    fn lock_for_write(&self) -> Result<(), StoreError> {
        Ok(())
    }

    fn refresh(&self) -> Result<Option<TripTables>, StoreError> {
        Ok(None)
    }

    fn persist(&self, _tables: &TripTables) -> Result<(), StoreError> {
        Ok(())
    }

    fn watch(&self) -> Option<FileWatch> {
        None
    }
}
