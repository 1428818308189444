//! Runtime configuration for storage, logging and appearance.
//!
//! # Responsibility
//! - Resolve the data directory, store key, log level and initial theme.
//! - Derive on-disk locations from the data directory.
//!
//! # Invariants
//! - A validated config has an absolute data directory and a non-empty key.
//! - Environment values are validated, never silently ignored.

use crate::logging::{default_log_level, normalize_level};
use crate::service::theme::{ColorScheme, UnknownColorScheme};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Store key used when none is configured.
pub const DEFAULT_STORAGE_KEY: &str = "todos";
/// SQLite file name inside the data directory.
pub const DB_FILE_NAME: &str = "ticklist.sqlite3";
const LOG_DIR_NAME: &str = "logs";
const DEFAULT_DATA_DIR_NAME: &str = ".ticklist";

pub const ENV_DATA_DIR: &str = "TICKLIST_DATA_DIR";
pub const ENV_STORAGE_KEY: &str = "TICKLIST_STORAGE_KEY";
pub const ENV_LOG_LEVEL: &str = "TICKLIST_LOG_LEVEL";
pub const ENV_THEME: &str = "TICKLIST_THEME";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// No data directory configured and none could be derived.
    MissingDataDir,
    RelativeDataDir(PathBuf),
    EmptyStorageKey,
    InvalidLogLevel(String),
    InvalidColorScheme(UnknownColorScheme),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingDataDir => write!(
                f,
                "no data directory configured; set {ENV_DATA_DIR} or HOME"
            ),
            Self::RelativeDataDir(path) => write!(
                f,
                "data directory must be an absolute path, got `{}`",
                path.display()
            ),
            Self::EmptyStorageKey => write!(f, "storage key cannot be empty"),
            Self::InvalidLogLevel(message) => write!(f, "{message}"),
            Self::InvalidColorScheme(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidColorScheme(err) => Some(err),
            _ => None,
        }
    }
}

impl From<UnknownColorScheme> for ConfigError {
    fn from(value: UnknownColorScheme) -> Self {
        Self::InvalidColorScheme(value)
    }
}

/// Settings shared by the core and its front ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub data_dir: PathBuf,
    pub storage_key: String,
    pub log_level: String,
    pub color_scheme: ColorScheme,
}

impl CoreConfig {
    /// Creates a config rooted at `data_dir` with default settings.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            log_level: default_log_level().to_string(),
            color_scheme: ColorScheme::default(),
        }
    }

    /// Builds a config from `TICKLIST_*` environment variables.
    ///
    /// The data directory falls back to `$HOME/.ticklist`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    /// Applies the key, log level and theme environment variables to `self`.
    ///
    /// Used when the data directory comes from somewhere else (a CLI flag).
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.apply_lookup(env_lookup)
    }

    pub(crate) fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let data_dir = match non_empty(&lookup, ENV_DATA_DIR) {
            Some(dir) => PathBuf::from(dir.trim()),
            None => non_empty(&lookup, "HOME")
                .map(|home| Path::new(home.trim()).join(DEFAULT_DATA_DIR_NAME))
                .ok_or(ConfigError::MissingDataDir)?,
        };
        Self::new(data_dir).apply_lookup(lookup)
    }

    fn apply_lookup(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(key) = lookup(ENV_STORAGE_KEY) {
            self.storage_key = key;
        }
        if let Some(level) = non_empty(&lookup, ENV_LOG_LEVEL) {
            self.log_level = level;
        }
        if let Some(theme) = non_empty(&lookup, ENV_THEME) {
            self.color_scheme = theme.parse()?;
        }

        self.validate()?;
        Ok(self)
    }

    /// Checks path, key and log level; normalizes the log level in place.
    pub fn validate(&mut self) -> Result<(), ConfigError> {
        if !self.data_dir.is_absolute() {
            return Err(ConfigError::RelativeDataDir(self.data_dir.clone()));
        }
        if self.storage_key.trim().is_empty() {
            return Err(ConfigError::EmptyStorageKey);
        }
        self.log_level = normalize_level(&self.log_level)
            .map_err(ConfigError::InvalidLogLevel)?
            .to_string();
        Ok(())
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE_NAME)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join(LOG_DIR_NAME)
    }
}

fn env_lookup(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

fn non_empty(lookup: impl Fn(&str) -> Option<String>, name: &str) -> Option<String> {
    lookup(name).filter(|value| !value.trim().is_empty())
}
