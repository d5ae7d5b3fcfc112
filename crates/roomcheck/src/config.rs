//! Configuration management for roomcheck.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::room::{RoomRange, MAX_ROOM, MIN_ROOM};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "roomcheck";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "sitting.db";

/// Default JSON record directory name.
const JSON_DIR_NAME: &str = "records";

/// Environment variable holding the admin secret, read verbatim.
const SECRET_ENV_VAR: &str = "ROOMCHECK_ADMIN__SECRET";

/// Built-in admin PIN. Meant to be overridden per deployment.
pub const DEFAULT_ADMIN_SECRET: &str = "1234";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `ROOMCHECK_`, sections split by `__`)
/// 2. TOML config file at `~/.config/roomcheck/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Valid room range.
    pub rooms: RoomsConfig,
    /// Admin gate configuration.
    pub admin: AdminConfig,
    /// Optional sitting features.
    pub features: FeaturesConfig,
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Admin overview configuration.
    pub overview: OverviewConfig,
}

/// Valid room range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomsConfig {
    /// Lowest valid room number.
    pub min_room: u16,
    /// Highest valid room number.
    pub max_room: u16,
}

/// Admin gate configuration.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Shared PIN unlocking the admin commands.
    pub secret: String,
}

/// Optional sitting features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeaturesConfig {
    /// Allow admins to add rooms on top of the uploaded roster.
    pub manual_rooms: bool,
    /// Record check-ins from rooms that are not expected.
    /// When off, such check-ins are rejected without a trace.
    pub unexpected_log: bool,
}

/// Which backend holds the sitting sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Local `SQLite` database.
    #[default]
    Sqlite,
    /// Directory of JSON files.
    Json,
    /// Process memory only; nothing survives the command.
    Memory,
}

/// Storage-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Backend holding the sets.
    pub backend: StorageBackend,
    /// Path to the database file.
    /// Defaults to `~/.local/share/roomcheck/sitting.db`
    pub database_path: Option<PathBuf>,
    /// Directory for the JSON backend.
    /// Defaults to `~/.local/share/roomcheck/records`
    pub json_dir: Option<PathBuf>,
}

/// Admin overview configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverviewConfig {
    /// Seconds between re-reads in watch mode.
    pub refresh_interval_secs: u64,
}

impl Default for RoomsConfig {
    fn default() -> Self {
        Self {
            min_room: MIN_ROOM,
            max_room: MAX_ROOM,
        }
    }
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            secret: DEFAULT_ADMIN_SECRET.to_string(),
        }
    }
}

impl std::fmt::Debug for AdminConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminConfig")
            .field("secret", &"<redacted>")
            .finish()
    }
}

impl Default for FeaturesConfig {
    fn default() -> Self {
        Self {
            manual_rooms: true,
            unexpected_log: true,
        }
    }
}

impl Default for OverviewConfig {
    fn default() -> Self {
        Self {
            refresh_interval_secs: 5,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);
        Self::from_figment(Self::figment(Toml::file(&config_file)))
    }

    fn figment(file: impl figment::Provider) -> Figment {
        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(file)
            .merge(
                Env::prefixed("ROOMCHECK_")
                    .split("__")
                    .filter(|key| !key.as_str().eq_ignore_ascii_case("admin.secret")),
            );

        // Env values are parsed as typed values, which would turn a numeric
        // PIN into an integer and drop leading zeros.
        match std::env::var(SECRET_ENV_VAR) {
            Ok(secret) => figment.merge(Serialized::default("admin.secret", secret)),
            Err(_) => figment,
        }
    }

    fn from_figment(figment: Figment) -> Result<Self> {
        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.rooms.min_room == 0 {
            return Err(Error::ConfigValidation {
                message: "min_room must be greater than 0".to_string(),
            });
        }

        if self.rooms.min_room > self.rooms.max_room {
            return Err(Error::ConfigValidation {
                message: format!(
                    "min_room ({}) cannot be greater than max_room ({})",
                    self.rooms.min_room, self.rooms.max_room
                ),
            });
        }

        if self.admin.secret.is_empty() {
            return Err(Error::ConfigValidation {
                message: "admin secret must not be empty".to_string(),
            });
        }

        if self.overview.refresh_interval_secs == 0 {
            return Err(Error::ConfigValidation {
                message: "refresh_interval_secs must be greater than 0".to_string(),
            });
        }

        Ok(())
    }

    /// The valid room range.
    ///
    /// Falls back to the default range if the bounds are inverted; `load`
    /// rejects such a configuration, so this only matters for hand-built values.
    #[must_use]
    pub fn room_range(&self) -> RoomRange {
        RoomRange::new(self.rooms.min_room, self.rooms.max_room).unwrap_or_default()
    }

    /// Whether the admin secret is still the built-in default.
    #[must_use]
    pub fn uses_default_secret(&self) -> bool {
        self.admin.secret == DEFAULT_ADMIN_SECRET
    }

    /// Warning for admin commands while the built-in secret is in use.
    ///
    /// The text never contains the secret.
    #[must_use]
    pub fn default_secret_warning(&self) -> Option<&'static str> {
        self.uses_default_secret().then_some(
            "Admin PIN is still the built-in default; set admin.secret or ROOMCHECK_ADMIN__SECRET",
        )
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }

    /// Get the JSON record directory, resolving defaults if not set.
    #[must_use]
    pub fn json_dir(&self) -> PathBuf {
        self.storage
            .json_dir
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(JSON_DIR_NAME))
    }

    /// Get the watch refresh interval as a Duration.
    #[must_use]
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.overview.refresh_interval_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.rooms.min_room, 100);
        assert_eq!(config.rooms.max_room, 639);
        assert!(config.features.manual_rooms);
        assert!(config.features.unexpected_log);
        assert_eq!(config.storage.backend, StorageBackend::Sqlite);
        assert!(config.uses_default_secret());
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_inverted_range() {
        let mut config = Config::default();
        config.rooms.min_room = 700;
        config.rooms.max_room = 100;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("min_room"));
    }

    #[test]
    fn test_validate_zero_min_room() {
        let mut config = Config::default();
        config.rooms.min_room = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_empty_secret() {
        let mut config = Config::default();
        config.admin.secret = String::new();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("secret"));
    }

    #[test]
    fn test_validate_zero_refresh_interval() {
        let mut config = Config::default();
        config.overview.refresh_interval_secs = 0;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("refresh_interval_secs"));
    }

    #[test]
    fn test_room_range() {
        let mut config = Config::default();
        config.rooms.min_room = 1;
        config.rooms.max_room = 50;

        let range = config.room_range();
        assert_eq!(range.min(), 1);
        assert_eq!(range.max(), 50);
    }

    #[test]
    fn test_room_range_falls_back_when_inverted() {
        let mut config = Config::default();
        config.rooms.min_room = 900;
        config.rooms.max_room = 1;

        assert_eq!(config.room_range(), RoomRange::default());
    }

    #[test]
    fn test_database_path_default() {
        let path = Config::default().database_path();
        assert!(path.to_string_lossy().contains("sitting.db"));
    }

    #[test]
    fn test_database_path_custom() {
        let mut config = Config::default();
        config.storage.database_path = Some(PathBuf::from("/custom/path/db.sqlite"));

        assert_eq!(
            config.database_path(),
            PathBuf::from("/custom/path/db.sqlite")
        );
    }

    #[test]
    fn test_json_dir_default() {
        let path = Config::default().json_dir();
        assert!(path.to_string_lossy().contains("records"));
    }

    #[test]
    fn test_refresh_interval() {
        assert_eq!(Config::default().refresh_interval(), Duration::from_secs(5));
    }

    #[test]
    fn test_admin_debug_redacts_secret() {
        let mut config = Config::default();
        config.admin.secret = "s3cret-pin".to_string();

        let debug_str = format!("{config:?}");
        assert!(!debug_str.contains("s3cret-pin"));
        assert!(debug_str.contains("redacted"));
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path();
        assert!(path.to_string_lossy().contains("roomcheck"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_load_nonexistent_config() {
        Jail::expect_with(|_| {
            let config =
                Config::load_from(Some(PathBuf::from("/nonexistent/config.toml"))).unwrap();
            assert_eq!(config, Config::default());
            Ok(())
        });
    }

    #[test]
    fn test_default_secret_warning_hides_secret() {
        let warning = Config::default().default_secret_warning().unwrap();
        assert!(!warning.contains(DEFAULT_ADMIN_SECRET));

        let mut config = Config::default();
        config.admin.secret = "2468".to_string();
        assert!(config.default_secret_warning().is_none());
    }

    #[test]
    fn test_env_secret_is_read_verbatim() {
        for pin in ["9999", "0123", "open sesame"] {
            Jail::expect_with(|jail| {
                jail.set_env(SECRET_ENV_VAR, pin);

                let config = Config::from_figment(Config::figment(Toml::string("")))
                    .map_err(|e| e.to_string())?;

                assert_eq!(config.admin.secret, pin);
                assert!(!config.uses_default_secret());
                Ok(())
            });
        }
    }

    #[test]
    fn test_env_secret_overrides_toml() {
        Jail::expect_with(|jail| {
            jail.set_env(SECRET_ENV_VAR, "0042");
            let toml = r#"
                [admin]
                secret = "9876"
            "#;

            let config = Config::from_figment(Config::figment(Toml::string(toml)))
                .map_err(|e| e.to_string())?;

            assert_eq!(config.admin.secret, "0042");
            Ok(())
        });
    }

    #[test]
    fn test_env_still_sets_other_sections() {
        Jail::expect_with(|jail| {
            jail.set_env("ROOMCHECK_ROOMS__MAX_ROOM", "450");
            jail.set_env("ROOMCHECK_FEATURES__UNEXPECTED_LOG", "false");

            let config = Config::from_figment(Config::figment(Toml::string("")))
                .map_err(|e| e.to_string())?;

            assert_eq!(config.rooms.max_room, 450);
            assert!(!config.features.unexpected_log);
            Ok(())
        });
    }

    #[test]
    fn test_toml_overrides_defaults() {
        let toml = r#"
            [rooms]
            max_room = 420

            [admin]
            secret = "9876"

            [features]
            unexpected_log = false

            [storage]
            backend = "json"
            json_dir = "/srv/breakfast"
        "#;

        Jail::expect_with(|_| {
            let config = Config::from_figment(Config::figment(Toml::string(toml))).unwrap();

            assert_eq!(config.rooms.min_room, 100);
            assert_eq!(config.rooms.max_room, 420);
            assert_eq!(config.admin.secret, "9876");
            assert!(config.features.manual_rooms);
            assert!(!config.features.unexpected_log);
            assert_eq!(config.storage.backend, StorageBackend::Json);
            assert_eq!(config.json_dir(), PathBuf::from("/srv/breakfast"));
            Ok(())
        });
    }

    #[test]
    fn test_toml_invalid_values_rejected() {
        let toml = r"
            [rooms]
            min_room = 500
            max_room = 200
        ";

        let result = Config::from_figment(Config::figment(Toml::string(toml)));
        assert!(matches!(result, Err(Error::ConfigValidation { .. })));
    }

    #[test]
    fn test_storage_backend_serde() {
        let json = serde_json::to_string(&StorageBackend::Memory).unwrap();
        assert_eq!(json, "\"memory\"");

        let backend: StorageBackend = serde_json::from_str("\"sqlite\"").unwrap();
        assert_eq!(backend, StorageBackend::Sqlite);
    }

    #[test]
    fn test_config_clone() {
        let config = Config::default();
        assert_eq!(config.clone(), config);
    }
}
