//! Storage layer for roomcheck.
//!
//! The four sitting sets are independently keyed records behind the
//! [`SetStore`] trait. Everything above this module talks to the trait only,
//! so the backend is a configuration choice:
//!
//! - [`SqliteStore`]: a local `SQLite` database (default).
//! - [`JsonDirStore`]: one `<record>.json` file per set in a directory.
//! - [`MemoryStore`]: process-local, used by tests and dry runs.

mod file;
mod memory;
pub mod migrations;
pub mod schema;
mod sqlite;

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::{Config, StorageBackend};
use crate::error::Result;
use crate::room::{RoomId, RoomRange, RoomSet};

pub use file::JsonDirStore;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// The named records making up one sitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SetKey {
    /// Rooms expected to check in (the uploaded roster).
    Roster,
    /// Rooms that have checked in.
    Ledger,
    /// Rooms added by hand on top of the roster.
    ManualRoster,
    /// Rooms that tried to check in without being expected.
    Unexpected,
}

impl SetKey {
    /// Every record, in the order a full reset clears them.
    pub const ALL: [Self; 4] = [
        Self::Roster,
        Self::Ledger,
        Self::ManualRoster,
        Self::Unexpected,
    ];

    /// The record name used by every backend.
    #[must_use]
    pub fn record_name(self) -> &'static str {
        match self {
            Self::Roster => "rooms",
            Self::Ledger => "checkins",
            Self::ManualRoster => "manual_rooms",
            Self::Unexpected => "unexpected_rooms",
        }
    }
}

impl fmt::Display for SetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.record_name())
    }
}

/// A key-value store holding room sets.
///
/// Writes are whole-record replacements ("last write wins"). Backends that
/// can add a single member atomically should override [`SetStore::insert`];
/// the default reads the full set and writes it back, which loses updates
/// when two writers interleave.
pub trait SetStore: fmt::Debug {
    /// Short name of the backend, for status output.
    fn backend_name(&self) -> &'static str;

    /// Read a set. A record that was never written reads as empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn read_set(&self, key: SetKey) -> Result<RoomSet>;

    /// Replace a set wholesale.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    fn write_set(&self, key: SetKey, rooms: &RoomSet) -> Result<()>;

    /// Delete a record. Deleting a missing record is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    fn delete(&self, key: SetKey) -> Result<()>;

    /// Add one room to a set.
    ///
    /// Returns `false` if the room was already present.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or written.
    fn insert(&self, key: SetKey, room: RoomId) -> Result<bool> {
        let mut rooms = self.read_set(key)?;
        if !rooms.insert(room) {
            return Ok(false);
        }
        self.write_set(key, &rooms)?;
        Ok(true)
    }

    /// Delete several records.
    ///
    /// The default issues one delete per record, so a failure part way
    /// through leaves the earlier records deleted.
    ///
    /// # Errors
    ///
    /// Returns the first delete error.
    fn clear(&self, keys: &[SetKey]) -> Result<()> {
        for key in keys {
            self.delete(*key)?;
        }
        Ok(())
    }
}

/// Open the store selected by the configuration.
///
/// # Errors
///
/// Returns an error if the backend cannot be opened.
pub fn open_store(config: &Config) -> Result<Box<dyn SetStore>> {
    let store: Box<dyn SetStore> = match config.storage.backend {
        StorageBackend::Sqlite => Box::new(SqliteStore::open(config.database_path())?),
        StorageBackend::Json => Box::new(JsonDirStore::open(config.json_dir())?),
        StorageBackend::Memory => Box::new(MemoryStore::new()),
    };
    debug!("Using {} store", store.backend_name());
    Ok(store)
}

/// Serialize a set as a JSON array of room strings, ascending.
pub(crate) fn encode_record(rooms: &RoomSet) -> Result<String> {
    Ok(serde_json::to_string(rooms)?)
}

/// Parse a stored JSON array into a set.
///
/// `null` reads as empty. Entries may be strings or bare numbers; anything
/// that is not a room number is skipped with a warning rather than failing
/// the whole record.
pub(crate) fn decode_record(key: SetKey, raw: &str) -> Result<RoomSet> {
    let values: Option<Vec<serde_json::Value>> = serde_json::from_str(raw)?;
    let mut rooms = RoomSet::new();

    for value in values.unwrap_or_default() {
        let parsed = match &value {
            serde_json::Value::String(s) => RoomRange::ANY.parse(s).ok(),
            serde_json::Value::Number(n) => RoomRange::ANY.parse(&n.to_string()).ok(),
            _ => None,
        };
        match parsed {
            Some(room) => {
                rooms.insert(room);
            }
            None => warn!("Skipping malformed entry {} in record '{}'", value, key),
        }
    }

    Ok(rooms)
}
