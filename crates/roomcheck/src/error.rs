//! Error types for roomcheck.
//!
//! This module defines the crate-wide error type. Room validation failures
//! have their own [`RoomError`](crate::room::RoomError) and are folded in here
//! when they cross an operation boundary.

use std::path::PathBuf;
use thiserror::Error;

use crate::room::RoomError;

/// The main error type for roomcheck operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Storage Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    /// The set store did not respond or reported a failure.
    #[error("store unavailable while accessing '{record}': {message}")]
    StoreUnavailable {
        /// Name of the record being accessed.
        record: &'static str,
        /// Description of what went wrong.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Check-in Errors ===
    /// A room number failed validation.
    #[error(transparent)]
    Room(#[from] RoomError),

    /// No roster or manual room is loaded, so check-ins are not open.
    #[error("room list not available yet")]
    SittingNotOpen,

    /// The requested operation is switched off in the configuration.
    #[error("feature disabled: {feature}")]
    FeatureDisabled {
        /// Name of the disabled feature.
        feature: &'static str,
    },

    // === Admin Errors ===
    /// The admin PIN did not match.
    #[error("admin access denied")]
    AccessDenied,

    /// An admin operation was attempted without a PIN.
    #[error("admin PIN required")]
    PinRequired,

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for roomcheck operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a store-unavailable error for the given record.
    #[must_use]
    pub fn store_unavailable(record: &'static str, message: impl Into<String>) -> Self {
        Self::StoreUnavailable {
            record,
            message: message.into(),
        }
    }

    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this error means the backing store could not be used.
    ///
    /// Database and file errors count as well, since every backend surfaces
    /// an unreachable store through one of them.
    #[must_use]
    pub fn is_store_unavailable(&self) -> bool {
        matches!(
            self,
            Self::StoreUnavailable { .. }
                | Self::DatabaseOpen { .. }
                | Self::DatabaseQuery(_)
                | Self::Io(_)
                | Self::Json(_)
        )
    }

    /// Check if this error is an admin access failure, wrong or missing PIN.
    #[must_use]
    pub fn is_access_denied(&self) -> bool {
        matches!(self, Self::AccessDenied | Self::PinRequired)
    }

    /// Check if this error is a room validation failure.
    #[must_use]
    pub fn is_room_error(&self) -> bool {
        matches!(self, Self::Room(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::AccessDenied;
        assert_eq!(err.to_string(), "admin access denied");

        let err = Error::internal("test error");
        assert_eq!(err.to_string(), "internal error: test error");
    }

    #[test]
    fn test_store_unavailable_display() {
        let err = Error::store_unavailable("checkins", "connection refused");
        let msg = err.to_string();
        assert!(msg.contains("checkins"));
        assert!(msg.contains("connection refused"));
        assert!(err.is_store_unavailable());
    }

    #[test]
    fn test_error_is_access_denied() {
        assert!(Error::AccessDenied.is_access_denied());
        assert!(Error::PinRequired.is_access_denied());
        assert!(!Error::internal("x").is_access_denied());
    }

    #[test]
    fn test_room_error_is_transparent() {
        let err: Error = RoomError::InvalidFormat {
            input: "12a".to_string(),
        }
        .into();
        assert!(err.is_room_error());
        assert!(err.to_string().contains("12a"));
    }

    #[test]
    fn test_feature_disabled_display() {
        let err = Error::FeatureDisabled {
            feature: "manual_rooms",
        };
        assert_eq!(err.to_string(), "feature disabled: manual_rooms");
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(err.to_string().contains("file not found"));
        assert!(err.is_store_unavailable());
    }

    #[test]
    fn test_from_rusqlite_error() {
        let result = rusqlite::Connection::open_with_flags(
            "/nonexistent/path/db.sqlite",
            rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY,
        );
        if let Err(sqlite_err) = result {
            let err: Error = sqlite_err.into();
            assert!(matches!(err, Error::DatabaseQuery(_)));
        }
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<Vec<String>>("not json").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_config_validation_display() {
        let err = Error::ConfigValidation {
            message: "min_room too large".to_string(),
        };
        assert!(err.to_string().contains("min_room too large"));
    }
}
