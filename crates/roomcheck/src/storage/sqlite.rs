//! `SQLite`-backed set store.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Transaction, TransactionBehavior};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::room::{RoomId, RoomSet};

use super::{decode_record, encode_record, migrations, SetKey, SetStore};

/// How long a writer waits on a locked database before giving up.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Set store persisted in a local `SQLite` database.
///
/// Single-member inserts and multi-record clears run inside one immediate
/// transaction, so concurrent check-ins from several processes do not lose
/// each other's writes and a reset is never observed half done.
#[derive(Debug)]
pub struct SqliteStore {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
}

impl SqliteStore {
    /// Open or create a store database at the given path.
    ///
    /// Creates the parent directories if they don't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        migrations::initialize_schema(&conn)?;

        info!("Database opened at {}", path.display());
        Ok(Self { path, conn })
    }

    /// Create an in-memory store for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn,
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_raw(conn: &Connection, key: SetKey) -> Result<RoomSet> {
        let raw: Option<String> = conn
            .query_row(
                "SELECT value FROM records WHERE key = ?1",
                [key.record_name()],
                |row| row.get(0),
            )
            .optional()?;

        match raw {
            Some(raw) => decode_record(key, &raw),
            None => Ok(RoomSet::new()),
        }
    }

    fn write_raw(conn: &Connection, key: SetKey, rooms: &RoomSet) -> Result<()> {
        let value = encode_record(rooms)?;
        conn.execute(
            r"
            INSERT INTO records (key, value, updated_at) VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            ",
            params![key.record_name(), value, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }
}

impl SetStore for SqliteStore {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    fn read_set(&self, key: SetKey) -> Result<RoomSet> {
        Self::read_raw(&self.conn, key)
    }

    fn write_set(&self, key: SetKey, rooms: &RoomSet) -> Result<()> {
        Self::write_raw(&self.conn, key, rooms)?;
        debug!("Wrote {} rooms to '{}'", rooms.len(), key);
        Ok(())
    }

    fn delete(&self, key: SetKey) -> Result<()> {
        self.conn
            .execute("DELETE FROM records WHERE key = ?1", [key.record_name()])?;
        Ok(())
    }

    fn insert(&self, key: SetKey, room: RoomId) -> Result<bool> {
        let tx = Transaction::new_unchecked(&self.conn, TransactionBehavior::Immediate)?;
        let mut rooms = Self::read_raw(&tx, key)?;
        if !rooms.insert(room) {
            return Ok(false);
        }
        Self::write_raw(&tx, key, &rooms)?;
        tx.commit()?;
        Ok(true)
    }

    fn clear(&self, keys: &[SetKey]) -> Result<()> {
        let tx = Transaction::new_unchecked(&self.conn, TransactionBehavior::Immediate)?;
        for key in keys {
            tx.execute("DELETE FROM records WHERE key = ?1", [key.record_name()])?;
        }
        tx.commit()?;
        Ok(())
    }
}
