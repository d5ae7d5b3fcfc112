//! `roomcheck` - Breakfast check-in by room number
//!
//! Guests enter their room number and are told whether they are expected,
//! already checked in, or unexpected. Admins upload the list of expected
//! rooms, add missing rooms by hand, watch progress floor by floor and reset
//! everything between sittings.
//!
//! All state lives in four room sets behind a [`SetStore`]; the
//! reconciliation rules in [`engine`] are pure functions over those sets.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod gate;
pub mod logging;
pub mod notice;
pub mod overview;
pub mod refresh;
pub mod room;
pub mod roster;
pub mod storage;
pub mod tracker;

pub use config::Config;
pub use engine::{classify_check_in, CheckInOutcome, Classification, SittingSets};
pub use error::{Error, Result};
pub use gate::{Access, AdminGate};
pub use logging::init_logging;
pub use notice::{Notice, Severity};
pub use overview::{build_overview, Overview};
pub use room::{RoomId, RoomRange, RoomSet};
pub use roster::{parse_roster, RosterUpload};
pub use storage::{open_store, SetKey, SetStore};
pub use tracker::{AdminSession, Features, ManualAdd, Tracker};
