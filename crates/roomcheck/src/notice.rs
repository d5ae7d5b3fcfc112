//! User-facing messages.

use std::fmt;

use serde::Serialize;

use crate::engine::CheckInOutcome;
use crate::error::Error;
use crate::roster::RosterUpload;
use crate::tracker::ManualAdd;

/// How a message should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Something worked.
    Success,
    /// Nothing went wrong, but there is something to say.
    Info,
    /// The request went through, with a caveat.
    Warning,
    /// The request was refused or failed.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "ok"),
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// A message for whoever triggered the operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    /// Presentation severity.
    pub severity: Severity,
    /// The text.
    pub message: String,
}

impl Notice {
    /// Create a notice.
    #[must_use]
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
        }
    }

    /// Whether the notice reports a refusal or failure.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Message for a manual room addition.
    #[must_use]
    pub fn for_manual_add(result: ManualAdd) -> Self {
        match result {
            ManualAdd::Added(room) => {
                Self::new(Severity::Success, format!("Room {room} added manually."))
            }
            ManualAdd::AlreadyAdded(room) => Self::new(
                Severity::Info,
                format!("Room {room} was already added manually."),
            ),
        }
    }

    /// Message for a roster upload.
    ///
    /// Skipped lines are not mentioned. An upload with no valid room still
    /// replaces the roster, which closes check-ins, so it is a warning.
    #[must_use]
    pub fn for_upload(upload: &RosterUpload) -> Self {
        if upload.is_empty() {
            return Self::new(
                Severity::Warning,
                "The uploaded list contains no valid rooms. The room list is now empty.",
            );
        }
        Self::new(
            Severity::Success,
            format!("{} rooms uploaded.", upload.len()),
        )
    }

    /// Message for an operation that failed.
    #[must_use]
    pub fn for_error(err: &Error) -> Self {
        let message = match err {
            Error::Room(room_err) => room_err.to_string(),
            Error::SittingNotOpen => "Room list not available yet.".to_string(),
            Error::AccessDenied => "Incorrect PIN".to_string(),
            Error::PinRequired => "Admin access required. Enter the admin PIN.".to_string(),
            err if err.is_store_unavailable() => {
                format!("The room list could not be reached, please try again. ({err})")
            }
            err => err.to_string(),
        };
        Self::new(Severity::Error, message)
    }
}

impl From<CheckInOutcome> for Notice {
    fn from(outcome: CheckInOutcome) -> Self {
        match outcome {
            CheckInOutcome::AlreadyCheckedIn { room } => Self::new(
                Severity::Info,
                format!("Room {room} is already checked in. Enjoy your breakfast!"),
            ),
            CheckInOutcome::Accepted { room } => Self::new(
                Severity::Success,
                format!("Room {room} checked in. Bon appétit!"),
            ),
            CheckInOutcome::Unexpected {
                recorded: true, ..
            } => Self::new(
                Severity::Warning,
                "We didn't find your room. Please continue with the breakfast and we'll sort it out.",
            ),
            CheckInOutcome::Unexpected {
                room,
                recorded: false,
            } => Self::new(
                Severity::Error,
                format!("Room {room} is not on today's list. Please ask a member of staff."),
            ),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.severity, self.message)
    }
}
