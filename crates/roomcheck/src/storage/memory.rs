//! In-memory set store.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::error::{Error, Result};
use crate::room::{RoomId, RoomSet};

use super::{SetKey, SetStore};

/// A process-local store. Every operation, including [`SetStore::insert`]
/// and [`SetStore::clear`], runs under a single lock.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<SetKey, RoomSet>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<SetKey, RoomSet>>> {
        self.records
            .lock()
            .map_err(|_| Error::internal("memory store lock poisoned"))
    }
}

impl SetStore for MemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    fn read_set(&self, key: SetKey) -> Result<RoomSet> {
        Ok(self.lock()?.get(&key).cloned().unwrap_or_default())
    }

    fn write_set(&self, key: SetKey, rooms: &RoomSet) -> Result<()> {
        self.lock()?.insert(key, rooms.clone());
        Ok(())
    }

    fn delete(&self, key: SetKey) -> Result<()> {
        self.lock()?.remove(&key);
        Ok(())
    }

    fn insert(&self, key: SetKey, room: RoomId) -> Result<bool> {
        Ok(self.lock()?.entry(key).or_default().insert(room))
    }

    fn clear(&self, keys: &[SetKey]) -> Result<()> {
        let mut records = self.lock()?;
        for key in keys {
            records.remove(key);
        }
        Ok(())
    }
}
