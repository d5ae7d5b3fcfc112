//! Reconciliation of check-in attempts against the sitting sets.
//!
//! Everything here is pure: functions take the sets by reference and report
//! what should happen. [`Tracker`](crate::Tracker) applies the result to a
//! store.

use serde::{Deserialize, Serialize};

use crate::room::{RoomId, RoomSet};
use crate::storage::SetKey;

/// How a check-in attempt is classified.
///
/// Rules are checked in this order and the first match wins:
/// a room already in the ledger is never re-examined against the roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    /// The room is already in the ledger. Nothing changes.
    AlreadyCheckedIn,
    /// The room is expected. It goes into the ledger.
    Accepted,
    /// The room is neither expected nor checked in.
    Unexpected,
}

impl Classification {
    /// The record this classification adds the room to, if any.
    ///
    /// `log_unexpected` switches the unexpected-arrivals log on or off.
    #[must_use]
    pub fn target(self, log_unexpected: bool) -> Option<SetKey> {
        match self {
            Self::AlreadyCheckedIn => None,
            Self::Accepted => Some(SetKey::Ledger),
            Self::Unexpected => log_unexpected.then_some(SetKey::Unexpected),
        }
    }

    /// The outcome to report once the side effect from [`Self::target`] has
    /// been applied.
    #[must_use]
    pub fn outcome(self, room: RoomId, log_unexpected: bool) -> CheckInOutcome {
        match self {
            Self::AlreadyCheckedIn => CheckInOutcome::AlreadyCheckedIn { room },
            Self::Accepted => CheckInOutcome::Accepted { room },
            Self::Unexpected => CheckInOutcome::Unexpected {
                room,
                recorded: log_unexpected,
            },
        }
    }
}

/// Classify a validated room against the current sets.
#[must_use]
pub fn classify_check_in(
    room: RoomId,
    roster: &RoomSet,
    manual_roster: &RoomSet,
    ledger: &RoomSet,
) -> Classification {
    if ledger.contains(&room) {
        Classification::AlreadyCheckedIn
    } else if roster.contains(&room) || manual_roster.contains(&room) {
        Classification::Accepted
    } else {
        Classification::Unexpected
    }
}

/// The outcome reported back to the guest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CheckInOutcome {
    /// The room had already checked in.
    AlreadyCheckedIn {
        /// The room.
        room: RoomId,
    },
    /// The room is now checked in.
    Accepted {
        /// The room.
        room: RoomId,
    },
    /// The room is not on the list.
    Unexpected {
        /// The room.
        room: RoomId,
        /// Whether the attempt was written to the unexpected log.
        recorded: bool,
    },
}

/// A snapshot of the four sets making up one sitting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SittingSets {
    /// The uploaded roster.
    pub roster: RoomSet,
    /// Rooms added by hand.
    pub manual_roster: RoomSet,
    /// Rooms that have checked in.
    pub ledger: RoomSet,
    /// Unexpected arrivals.
    pub unexpected: RoomSet,
}

impl SittingSets {
    /// Roster ∪ manual roster, computed fresh on every call.
    #[must_use]
    pub fn valid_rooms(&self) -> RoomSet {
        self.roster.union(&self.manual_roster).copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room(s: &str) -> RoomId {
        s.parse().unwrap()
    }

    fn set(rooms: &[&str]) -> RoomSet {
        rooms.iter().map(|r| room(r)).collect()
    }

    fn classify(r: &str) -> Classification {
        classify_check_in(
            room(r),
            &set(&["101", "102", "215"]),
            &set(&["330"]),
            &set(&["101"]),
        )
    }

    #[test]
    fn test_ledger_wins_over_roster() {
        assert_eq!(classify("101"), Classification::AlreadyCheckedIn);
    }

    #[test]
    fn test_ledger_wins_even_when_not_valid() {
        let empty = RoomSet::new();
        assert_eq!(
            classify_check_in(room("450"), &empty, &empty, &set(&["450"])),
            Classification::AlreadyCheckedIn
        );
    }

    #[test]
    fn test_roster_and_manual_rooms_are_accepted() {
        assert_eq!(classify("102"), Classification::Accepted);
        assert_eq!(classify("330"), Classification::Accepted);
    }

    #[test]
    fn test_unknown_room_is_unexpected() {
        assert_eq!(classify("500"), Classification::Unexpected);
    }

    #[test]
    fn test_targets() {
        assert_eq!(Classification::AlreadyCheckedIn.target(true), None);
        assert_eq!(Classification::Accepted.target(false), Some(SetKey::Ledger));
        assert_eq!(
            Classification::Unexpected.target(true),
            Some(SetKey::Unexpected)
        );
        assert_eq!(Classification::Unexpected.target(false), None);
    }

    #[test]
    fn test_outcomes() {
        let r = room("499");
        assert_eq!(
            Classification::AlreadyCheckedIn.outcome(r, true),
            CheckInOutcome::AlreadyCheckedIn { room: r }
        );
        assert_eq!(
            Classification::Accepted.outcome(r, false),
            CheckInOutcome::Accepted { room: r }
        );
        assert_eq!(
            Classification::Unexpected.outcome(r, false),
            CheckInOutcome::Unexpected {
                room: r,
                recorded: false
            }
        );
    }

    #[test]
    fn test_valid_rooms_is_union() {
        let s = SittingSets {
            roster: set(&["101", "102"]),
            manual_roster: set(&["102", "330"]),
            ..SittingSets::default()
        };
        assert_eq!(s.valid_rooms(), set(&["101", "102", "330"]));
    }

    #[test]
    fn test_outcome_serializes_tagged() {
        let json = serde_json::to_value(CheckInOutcome::Unexpected {
            room: room("620"),
            recorded: true,
        })
        .unwrap();
        assert_eq!(
            json,
            serde_json::json!({"outcome": "unexpected", "room": "620", "recorded": true})
        );
    }
}
