//! Room identifiers and the valid room range.
//!
//! A [`RoomId`] only exists once its input has passed validation, so the rest
//! of the crate never re-checks digits or bounds.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Lowest room number accepted by default.
pub const MIN_ROOM: u16 = 100;

/// Highest room number accepted by default.
pub const MAX_ROOM: u16 = 639;

/// An ordered set of rooms. Iteration is ascending by room number.
pub type RoomSet = BTreeSet<RoomId>;

/// Errors produced while validating a room number.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoomError {
    /// The input is empty or contains something other than ASCII digits.
    #[error("invalid room number '{input}': only digits are allowed")]
    InvalidFormat {
        /// The rejected input, trimmed.
        input: String,
    },

    /// The input is numeric but outside the accepted range.
    #[error("room {input} is outside the valid range {min}-{max}")]
    OutOfRange {
        /// The rejected input, trimmed.
        input: String,
        /// Lowest accepted room.
        min: u16,
        /// Highest accepted room.
        max: u16,
    },
}

/// A validated room number.
///
/// Always rendered as its canonical decimal form, so `"0100"` and `"100"`
/// name the same room and both display as `100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RoomId(u16);

impl RoomId {
    /// The numeric value of this room.
    #[must_use]
    pub fn number(self) -> u16 {
        self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for RoomId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for RoomId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        RoomRange::ANY.parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Parses with the default range. Use [`RoomRange::parse`] for a configured one.
impl FromStr for RoomId {
    type Err = RoomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RoomRange::default().parse(s)
    }
}

/// The inclusive range of room numbers a sitting accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoomRange {
    min: u16,
    max: u16,
}

impl Default for RoomRange {
    fn default() -> Self {
        Self {
            min: MIN_ROOM,
            max: MAX_ROOM,
        }
    }
}

impl RoomRange {
    /// Every representable room number. Used when reading stored records,
    /// which were validated when they were written.
    pub const ANY: Self = Self {
        min: 0,
        max: u16::MAX,
    };

    /// Create a range. Returns `None` when `min > max`.
    #[must_use]
    pub fn new(min: u16, max: u16) -> Option<Self> {
        (min <= max).then_some(Self { min, max })
    }

    /// Lowest accepted room.
    #[must_use]
    pub fn min(self) -> u16 {
        self.min
    }

    /// Highest accepted room.
    #[must_use]
    pub fn max(self) -> u16 {
        self.max
    }

    /// Check whether a room number falls inside this range.
    #[must_use]
    pub fn contains(self, number: u16) -> bool {
        (self.min..=self.max).contains(&number)
    }

    /// Validate raw input into a [`RoomId`].
    ///
    /// Surrounding whitespace is ignored. Digit strings too long for any room
    /// are reported as out of range rather than malformed.
    ///
    /// # Errors
    ///
    /// Returns [`RoomError::InvalidFormat`] for empty or non-digit input and
    /// [`RoomError::OutOfRange`] for numbers outside the range.
    pub fn parse(self, input: &str) -> Result<RoomId, RoomError> {
        let trimmed = input.trim();
        if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(RoomError::InvalidFormat {
                input: trimmed.to_string(),
            });
        }

        let out_of_range = || RoomError::OutOfRange {
            input: trimmed.to_string(),
            min: self.min,
            max: self.max,
        };

        let number: u16 = trimmed.parse().map_err(|_| out_of_range())?;
        if self.contains(number) {
            Ok(RoomId(number))
        } else {
            Err(out_of_range())
        }
    }

    /// Floor buckets covering this range, one per hundred, clipped to the
    /// range bounds.
    #[must_use]
    pub fn floors(self) -> Vec<(u16, u16)> {
        (self.min / 100..=self.max / 100)
            .map(|floor| {
                let start = (floor * 100).max(self.min);
                let end = (floor * 100).saturating_add(99).min(self.max);
                (start, end)
            })
            .collect()
    }
}
