//! Admin overview: counters and floor-grouped room status.

use std::fmt::{self, Write as _};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::engine::SittingSets;
use crate::room::{RoomId, RoomRange};

/// Status of one valid room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomState {
    /// Checked in.
    Checked,
    /// Added by hand and not yet checked in.
    ManualPending,
    /// On the roster and not yet checked in.
    Pending,
}

impl RoomState {
    fn marker(self) -> &'static str {
        match self {
            Self::Checked => "[x]",
            Self::ManualPending => "[m]",
            Self::Pending => "[ ]",
        }
    }
}

/// One room line in a floor bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RoomStatus {
    /// The room.
    pub room: RoomId,
    /// Its state.
    pub state: RoomState,
}

/// All valid rooms within one floor range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FloorGroup {
    /// First room number of the bucket.
    pub first: u16,
    /// Last room number of the bucket.
    pub last: u16,
    /// Rooms in ascending order.
    pub rooms: Vec<RoomStatus>,
}

impl FloorGroup {
    /// Label such as `100-199`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{}-{}", self.first, self.last)
    }

    /// Number of checked-in rooms in this bucket.
    #[must_use]
    pub fn checked_count(&self) -> usize {
        self.rooms
            .iter()
            .filter(|r| r.state == RoomState::Checked)
            .count()
    }
}

/// Snapshot of sitting progress for the admin view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Overview {
    /// Number of valid rooms (roster ∪ manual).
    pub total: usize,
    /// Number of valid rooms that have checked in.
    pub checked_in: usize,
    /// Number of valid rooms still to come.
    pub remaining: usize,
    /// Valid rooms grouped by floor.
    pub floors: Vec<FloorGroup>,
    /// Unexpected arrivals, ascending.
    pub unexpected: Vec<RoomId>,
    /// Reads that failed and were treated as empty.
    pub warnings: Vec<String>,
    /// When this snapshot was taken.
    pub generated_at: DateTime<Utc>,
}

/// Build the overview from a snapshot of the sets.
///
/// Ledger entries that are not valid rooms (possible after a partial reset)
/// are left out of every count, which keeps `checked_in + remaining == total`.
#[must_use]
pub fn build_overview(range: RoomRange, sets: &SittingSets) -> Overview {
    let valid = sets.valid_rooms();

    let floors = range
        .floors()
        .into_iter()
        .map(|(first, last)| {
            let rooms = valid
                .iter()
                .filter(|room| (first..=last).contains(&room.number()))
                .map(|&room| {
                    let state = if sets.ledger.contains(&room) {
                        RoomState::Checked
                    } else if sets.manual_roster.contains(&room) {
                        RoomState::ManualPending
                    } else {
                        RoomState::Pending
                    };
                    RoomStatus { room, state }
                })
                .collect();
            FloorGroup { first, last, rooms }
        })
        .collect();

    let checked_in = valid.intersection(&sets.ledger).count();

    Overview {
        total: valid.len(),
        checked_in,
        remaining: valid.len() - checked_in,
        floors,
        unexpected: sets.unexpected.iter().copied().collect(),
        warnings: Vec::new(),
        generated_at: Utc::now(),
    }
}

impl Overview {
    /// Render as plain text for a terminal.
    #[must_use]
    pub fn render_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Overview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Live Breakfast Overview")?;
        writeln!(f, "=======================")?;
        writeln!(f, "Checked-in:  {} / {}", self.checked_in, self.total)?;
        writeln!(f, "Remaining:   {}", self.remaining)?;

        for warning in &self.warnings {
            writeln!(f, "Warning:     {warning}")?;
        }

        for floor in &self.floors {
            writeln!(f)?;
            writeln!(
                f,
                "[{}]  {}/{}",
                floor.label(),
                floor.checked_count(),
                floor.rooms.len()
            )?;
            let mut line = String::new();
            for status in &floor.rooms {
                let _ = write!(line, "  {} {}", status.state.marker(), status.room);
            }
            if !line.is_empty() {
                writeln!(f, "{line}")?;
            }
        }

        if !self.unexpected.is_empty() {
            writeln!(f)?;
            writeln!(f, "Unexpected Check-Ins")?;
            for room in &self.unexpected {
                writeln!(f, "  [!] Room {room}")?;
            }
        }

        Ok(())
    }
}
