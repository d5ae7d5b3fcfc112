//! Roster ingestion.
//!
//! Turns an uploaded plain-text room list into a validated [`RoomSet`].
//! Lines that are not room numbers within range are dropped without error;
//! hotel exports routinely carry headers, notes and blank lines.

use tracing::debug;

use crate::room::{RoomRange, RoomSet};

/// Result of parsing an uploaded roster.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RosterUpload {
    /// The accepted rooms, deduplicated and sorted ascending.
    pub rooms: RoomSet,
    /// Non-blank lines that were not valid rooms.
    pub dropped_lines: usize,
}

impl RosterUpload {
    /// Number of distinct rooms accepted.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    /// Whether no room was accepted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}

/// Parse roster text, one candidate room per line.
#[must_use]
pub fn parse_roster(text: &str, range: RoomRange) -> RosterUpload {
    let mut upload = RosterUpload::default();

    for (index, line) in text.lines().enumerate() {
        let candidate = line.trim();
        if candidate.is_empty() {
            continue;
        }
        match range.parse(candidate) {
            Ok(room) => {
                upload.rooms.insert(room);
            }
            Err(err) => {
                debug!("Dropping roster line {}: {}", index + 1, err);
                upload.dropped_lines += 1;
            }
        }
    }

    upload
}
