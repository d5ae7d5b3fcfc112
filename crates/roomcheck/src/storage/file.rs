//! JSON-directory set store.
//!
//! Lays records out as `<dir>/rooms.json`, `<dir>/checkins.json` and so on,
//! each holding a JSON array of room strings. Handy when the sets are synced
//! to another machine or inspected by hand.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Error, Result};
use crate::room::RoomSet;

use super::{decode_record, encode_record, SetKey, SetStore};

/// Set store writing one JSON file per record.
///
/// Each write goes to a temporary file that is then renamed over the record,
/// so readers never see a half-written array. Inserts use the trait's
/// read-modify-write default and are not safe across processes.
#[derive(Debug, Clone)]
pub struct JsonDirStore {
    dir: PathBuf,
}

impl JsonDirStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir).map_err(|source| Error::DirectoryCreate {
            path: dir.clone(),
            source,
        })?;
        debug!("Using JSON record directory {}", dir.display());
        Ok(Self { dir })
    }

    /// The directory holding the record files.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn record_path(&self, key: SetKey) -> PathBuf {
        self.dir.join(format!("{}.json", key.record_name()))
    }
}

impl SetStore for JsonDirStore {
    fn backend_name(&self) -> &'static str {
        "json"
    }

    fn read_set(&self, key: SetKey) -> Result<RoomSet> {
        match std::fs::read_to_string(self.record_path(key)) {
            Ok(raw) if raw.trim().is_empty() => Ok(RoomSet::new()),
            Ok(raw) => decode_record(key, &raw),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(RoomSet::new()),
            Err(err) => Err(err.into()),
        }
    }

    fn write_set(&self, key: SetKey, rooms: &RoomSet) -> Result<()> {
        let path = self.record_path(key);
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, encode_record(rooms)?)?;
        std::fs::rename(&tmp, &path)?;
        debug!("Wrote {} rooms to {}", rooms.len(), path.display());
        Ok(())
    }

    fn delete(&self, key: SetKey) -> Result<()> {
        match std::fs::remove_file(self.record_path(key)) {
            Err(err) if err.kind() != ErrorKind::NotFound => Err(err.into()),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::room::RoomId;

    fn room(s: &str) -> RoomId {
        s.parse().unwrap()
    }

    fn temp_store(name: &str) -> JsonDirStore {
        let dir = std::env::temp_dir().join(format!("roomcheck_json_{name}_{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        JsonDirStore::open(dir).unwrap()
    }

    #[test]
    fn test_missing_file_reads_empty() {
        let store = temp_store("missing");
        assert!(store.read_set(SetKey::Roster).unwrap().is_empty());
        let _ = std::fs::remove_dir_all(store.dir());
    }

    #[test]
    fn test_write_creates_named_file() {
        let store = temp_store("named");
        store
            .write_set(SetKey::Ledger, &RoomSet::from([room("105"), room("101")]))
            .unwrap();

        let raw = std::fs::read_to_string(store.dir().join("checkins.json")).unwrap();
        assert_eq!(raw, r#"["101","105"]"#);
        let _ = std::fs::remove_dir_all(store.dir());
    }

    #[test]
    fn test_insert_and_delete() {
        let store = temp_store("insert");
        assert!(store.insert(SetKey::Unexpected, room("620")).unwrap());
        assert!(!store.insert(SetKey::Unexpected, room("620")).unwrap());

        store.delete(SetKey::Unexpected).unwrap();
        store.delete(SetKey::Unexpected).unwrap();
        assert!(store.read_set(SetKey::Unexpected).unwrap().is_empty());
        let _ = std::fs::remove_dir_all(store.dir());
    }

    #[test]
    fn test_reads_hand_written_file() {
        let store = temp_store("hand");
        std::fs::write(store.dir().join("rooms.json"), "[\"101\", 102, \"oops\"]").unwrap();

        assert_eq!(
            store.read_set(SetKey::Roster).unwrap(),
            RoomSet::from([room("101"), room("102")])
        );
        let _ = std::fs::remove_dir_all(store.dir());
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let store = temp_store("corrupt");
        std::fs::write(store.dir().join("rooms.json"), "{not json").unwrap();

        let err = store.read_set(SetKey::Roster).unwrap_err();
        assert!(err.is_store_unavailable());
        let _ = std::fs::remove_dir_all(store.dir());
    }
}
