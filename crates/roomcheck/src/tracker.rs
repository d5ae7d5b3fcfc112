//! The check-in service.
//!
//! [`Tracker`] binds the reconciliation engine to a [`SetStore`] and the
//! configured feature flags. Guests call [`Tracker::check_in`]; admin
//! operations hang off an [`AdminSession`], which can only be obtained with
//! the right PIN.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::engine::{classify_check_in, CheckInOutcome, Classification, SittingSets};
use crate::error::{Error, Result};
use crate::gate::{Access, AdminGate};
use crate::overview::{build_overview, Overview};
use crate::room::{RoomId, RoomRange, RoomSet};
use crate::roster::{parse_roster, RosterUpload};
use crate::storage::{SetKey, SetStore};

/// Feature switches for a sitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Features {
    /// Admins may add rooms on top of the roster.
    pub manual_rooms: bool,
    /// Unexpected check-ins are recorded instead of rejected.
    pub unexpected_log: bool,
}

impl Default for Features {
    fn default() -> Self {
        Self {
            manual_rooms: true,
            unexpected_log: true,
        }
    }
}

/// Result of adding a room by hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "result", content = "room", rename_all = "snake_case")]
pub enum ManualAdd {
    /// The room was added.
    Added(RoomId),
    /// The room was already in the manual roster.
    AlreadyAdded(RoomId),
}

/// Check-in service over a set store.
#[derive(Debug)]
pub struct Tracker {
    store: Box<dyn SetStore>,
    range: RoomRange,
    features: Features,
    gate: AdminGate,
}

impl Tracker {
    /// Create a tracker with explicit settings.
    #[must_use]
    pub fn new(
        store: Box<dyn SetStore>,
        range: RoomRange,
        features: Features,
        gate: AdminGate,
    ) -> Self {
        Self {
            store,
            range,
            features,
            gate,
        }
    }

    /// Create a tracker from the loaded configuration.
    #[must_use]
    pub fn from_config(store: Box<dyn SetStore>, config: &Config) -> Self {
        Self::new(
            store,
            config.room_range(),
            Features {
                manual_rooms: config.features.manual_rooms,
                unexpected_log: config.features.unexpected_log,
            },
            AdminGate::new(config.admin.secret.clone()),
        )
    }

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &dyn SetStore {
        self.store.as_ref()
    }

    /// The valid room range.
    #[must_use]
    pub fn range(&self) -> RoomRange {
        self.range
    }

    /// The active feature switches.
    #[must_use]
    pub fn features(&self) -> Features {
        self.features
    }

    fn read(&self, key: SetKey) -> Result<RoomSet> {
        self.store
            .read_set(key)
            .map_err(|err| Error::store_unavailable(key.record_name(), err.to_string()))
    }

    /// Read a set, treating a failed read as empty and noting why.
    fn read_or_empty(&self, key: SetKey, warnings: &mut Vec<String>) -> RoomSet {
        self.read(key).unwrap_or_else(|err| {
            warn!("Treating '{}' as empty: {}", key, err);
            warnings.push(err.to_string());
            RoomSet::new()
        })
    }

    fn read_manual(&self) -> Result<RoomSet> {
        if self.features.manual_rooms {
            self.read(SetKey::ManualRoster)
        } else {
            Ok(RoomSet::new())
        }
    }

    fn insert(&self, key: SetKey, room: RoomId) -> Result<bool> {
        self.store
            .insert(key, room)
            .map_err(|err| Error::store_unavailable(key.record_name(), err.to_string()))
    }

    /// Whether any room is expected, i.e. check-ins are open.
    ///
    /// A store that cannot be read counts as not open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        let mut warnings = Vec::new();
        let roster = self.read_or_empty(SetKey::Roster, &mut warnings);
        if !roster.is_empty() {
            return true;
        }
        self.features.manual_rooms
            && !self
                .read_or_empty(SetKey::ManualRoster, &mut warnings)
                .is_empty()
    }

    /// Validate and classify a guest check-in, recording it in the store.
    ///
    /// The ledger update uses the store's single-member insert; if another
    /// writer got there first the outcome is reported as already checked in.
    ///
    /// # Errors
    ///
    /// Returns a room validation error for malformed or out-of-range input,
    /// [`Error::SittingNotOpen`] when no room is expected yet, and
    /// [`Error::StoreUnavailable`] if the store cannot be read or written.
    pub fn check_in(&self, input: &str) -> Result<CheckInOutcome> {
        let room = self.range.parse(input)?;

        let roster = self.read(SetKey::Roster)?;
        let manual_roster = self.read_manual()?;
        if roster.is_empty() && manual_roster.is_empty() {
            return Err(Error::SittingNotOpen);
        }
        let ledger = self.read(SetKey::Ledger)?;

        let classification = classify_check_in(room, &roster, &manual_roster, &ledger);
        debug!("Room {} classified as {:?}", room, classification);

        let log_unexpected = self.features.unexpected_log;
        if let Some(key) = classification.target(log_unexpected) {
            let added = self.insert(key, room)?;
            if !added && classification == Classification::Accepted {
                debug!("Room {} checked in concurrently", room);
                return Ok(CheckInOutcome::AlreadyCheckedIn { room });
            }
        }

        let outcome = classification.outcome(room, log_unexpected);
        match outcome {
            CheckInOutcome::Accepted { .. } => info!("Room {} checked in", room),
            CheckInOutcome::Unexpected { recorded: true, .. } => {
                warn!("Unexpected check-in from room {}", room);
            }
            CheckInOutcome::Unexpected {
                recorded: false, ..
            } => warn!("Rejected check-in from room {}", room),
            CheckInOutcome::AlreadyCheckedIn { .. } => {}
        }

        Ok(outcome)
    }

    /// Present a PIN and open an admin session.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PinRequired`] for an empty PIN and
    /// [`Error::AccessDenied`] for a wrong one.
    pub fn admin(&self, pin: &str) -> Result<AdminSession<'_>> {
        match self.gate.check(pin) {
            Access::Granted => Ok(AdminSession { tracker: self }),
            Access::Denied => {
                warn!("Admin PIN rejected");
                Err(Error::AccessDenied)
            }
            Access::NotAttempted => Err(Error::PinRequired),
        }
    }

    /// Read all four sets, degrading unreadable ones to empty.
    #[must_use]
    pub fn snapshot(&self) -> (SittingSets, Vec<String>) {
        let mut warnings = Vec::new();
        let sets = SittingSets {
            roster: self.read_or_empty(SetKey::Roster, &mut warnings),
            manual_roster: if self.features.manual_rooms {
                self.read_or_empty(SetKey::ManualRoster, &mut warnings)
            } else {
                RoomSet::new()
            },
            ledger: self.read_or_empty(SetKey::Ledger, &mut warnings),
            unexpected: self.read_or_empty(SetKey::Unexpected, &mut warnings),
        };
        (sets, warnings)
    }
}

/// Admin operations, available after a successful PIN check.
#[derive(Debug, Clone, Copy)]
pub struct AdminSession<'a> {
    tracker: &'a Tracker,
}

impl AdminSession<'_> {
    /// Replace the roster with the rooms parsed from `text`.
    ///
    /// This is a wholesale overwrite. Use [`Self::add_manual_room`] to add
    /// to the current sitting instead.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StoreUnavailable`] if the roster cannot be written.
    pub fn upload_roster(&self, text: &str) -> Result<RosterUpload> {
        let upload = parse_roster(text, self.tracker.range);
        if upload.is_empty() {
            warn!("Uploaded roster contains no valid rooms");
        }

        self.tracker
            .store
            .write_set(SetKey::Roster, &upload.rooms)
            .map_err(|err| Error::store_unavailable(SetKey::Roster.record_name(), err.to_string()))?;

        info!(
            "Roster replaced with {} rooms ({} lines dropped)",
            upload.len(),
            upload.dropped_lines
        );
        Ok(upload)
    }

    /// Add one room to the manual roster.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FeatureDisabled`] when manual rooms are switched off,
    /// a room validation error for bad input, and [`Error::StoreUnavailable`]
    /// if the store cannot be written.
    pub fn add_manual_room(&self, input: &str) -> Result<ManualAdd> {
        if !self.tracker.features.manual_rooms {
            return Err(Error::FeatureDisabled {
                feature: "manual_rooms",
            });
        }

        let room = self.tracker.range.parse(input)?;
        if self.tracker.insert(SetKey::ManualRoster, room)? {
            info!("Room {} added manually", room);
            Ok(ManualAdd::Added(room))
        } else {
            Ok(ManualAdd::AlreadyAdded(room))
        }
    }

    /// Clear the roster, manual roster, ledger and unexpected log.
    ///
    /// Whether the four clears happen as one unit depends on the backend.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StoreUnavailable`] if the store rejects the clear.
    pub fn reset(&self) -> Result<()> {
        self.tracker
            .store
            .clear(&SetKey::ALL)
            .map_err(|err| Error::store_unavailable("all records", err.to_string()))?;
        info!("Sitting reset");
        Ok(())
    }

    /// Build the overview. Unreadable sets show up as warnings, not errors.
    #[must_use]
    pub fn overview(&self) -> Overview {
        let (sets, warnings) = self.tracker.snapshot();
        let mut overview = build_overview(self.tracker.range, &sets);
        overview.warnings = warnings;
        overview
    }
}
