//! Runtime configuration resolution.
//!
//! # Responsibility
//! - Decide where the journal database and log files live.
//! - Merge explicit overrides, environment variables and platform defaults.
//!
//! # Invariants
//! - Precedence is override > environment > platform default.
//! - Blank values are treated as unset.
//! - `log_dir` is always absolute once resolved.

use crate::logging::default_log_level;
use directories::ProjectDirs;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const DB_PATH_ENV: &str = "RESONANCE_DB_PATH";
pub const LOG_DIR_ENV: &str = "RESONANCE_LOG_DIR";
pub const LOG_LEVEL_ENV: &str = "RESONANCE_LOG_LEVEL";

const APP_NAME: &str = "resonance";
const DB_FILE_NAME: &str = "resonance.sqlite3";
const LOG_DIR_NAME: &str = "logs";

/// Fully resolved runtime settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub log_dir: PathBuf,
    pub log_level: String,
}

/// Caller-provided values that win over everything else.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub db_path: Option<PathBuf>,
    pub log_dir: Option<PathBuf>,
    pub log_level: Option<String>,
}

#[derive(Debug)]
pub enum ConfigError {
    /// A relative log directory could not be anchored to the working directory.
    CurrentDir(std::io::Error),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CurrentDir(err) => write!(f, "cannot resolve working directory: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::CurrentDir(err) => Some(err),
        }
    }
}

impl AppConfig {
    /// Resolves settings from overrides and the process environment.
    pub fn resolve(overrides: ConfigOverrides) -> Result<Self, ConfigError> {
        Self::resolve_with(overrides, |key| std::env::var(key).ok())
    }

    /// Resolves settings using `env` as the variable source.
    pub fn resolve_with(
        overrides: ConfigOverrides,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let env_value = |key: &str| {
            env(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let base_dir = default_base_dir();

        let db_path = overrides
            .db_path
            .filter(|path| !path.as_os_str().is_empty())
            .or_else(|| env_value(DB_PATH_ENV).map(PathBuf::from))
            .unwrap_or_else(|| base_dir.join(DB_FILE_NAME));

        let log_dir = overrides
            .log_dir
            .filter(|path| !path.as_os_str().is_empty())
            .or_else(|| env_value(LOG_DIR_ENV).map(PathBuf::from))
            .unwrap_or_else(|| base_dir.join(LOG_DIR_NAME));

        let log_level = overrides
            .log_level
            .map(|level| level.trim().to_string())
            .filter(|level| !level.is_empty())
            .or_else(|| env_value(LOG_LEVEL_ENV))
            .unwrap_or_else(|| default_log_level().to_string());

        Ok(Self {
            db_path,
            log_dir: absolutize(&log_dir)?,
            log_level,
        })
    }
}

fn default_base_dir() -> PathBuf {
    ProjectDirs::from("", "", APP_NAME)
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| std::env::temp_dir().join(APP_NAME))
}

fn absolutize(path: &Path) -> Result<PathBuf, ConfigError> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().map_err(ConfigError::CurrentDir)?;
    Ok(cwd.join(path))
}
