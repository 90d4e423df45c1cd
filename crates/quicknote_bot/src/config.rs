//! Startup configuration read from the process environment.
//!
//! # Invariants
//! - `BOT_TOKEN` is required; everything else has a default.
//! - Paths in the returned config are absolute.
//! - The token never appears in `Debug` output.

use std::error::Error;
use std::fmt::{self, Debug, Display, Formatter};
use std::path::{Path, PathBuf};

/// Environment variable names.
pub mod env_vars {
    pub const BOT_TOKEN: &str = "BOT_TOKEN";
    pub const DB_PATH: &str = "QUICKNOTE_DB_PATH";
    pub const LOG_LEVEL: &str = "QUICKNOTE_LOG_LEVEL";
    pub const LOG_DIR: &str = "QUICKNOTE_LOG_DIR";
}

/// Default values.
pub mod defaults {
    pub const DB_PATH: &str = "notes.db";
    pub const LOG_DIR: &str = "logs";
}

#[derive(Debug)]
pub enum ConfigError {
    MissingVar(&'static str),
    WorkingDir(std::io::Error),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingVar(name) => write!(f, "{name} is not set"),
            Self::WorkingDir(err) => write!(f, "cannot resolve working directory: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::WorkingDir(err) => Some(err),
            Self::MissingVar(_) => None,
        }
    }
}

pub struct BotConfig {
    pub bot_token: String,
    pub db_path: PathBuf,
    pub log_level: String,
    pub log_dir: PathBuf,
}

impl Debug for BotConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotConfig")
            .field("bot_token", &"<redacted>")
            .field("db_path", &self.db_path)
            .field("log_level", &self.log_level)
            .field("log_dir", &self.log_dir)
            .finish()
    }
}

impl BotConfig {
    /// Reads the configuration from the real process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let cwd = std::env::current_dir().map_err(ConfigError::WorkingDir)?;
        Self::from_lookup(|key| std::env::var(key).ok(), &cwd)
    }

    /// Builds the configuration from `lookup`, resolving relative paths
    /// against `base_dir`. Blank values count as unset.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
        base_dir: &Path,
    ) -> Result<Self, ConfigError> {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let bot_token =
            get(env_vars::BOT_TOKEN).ok_or(ConfigError::MissingVar(env_vars::BOT_TOKEN))?;
        let db_path = get(env_vars::DB_PATH).unwrap_or_else(|| defaults::DB_PATH.to_string());
        let log_dir = get(env_vars::LOG_DIR).unwrap_or_else(|| defaults::LOG_DIR.to_string());
        let log_level = get(env_vars::LOG_LEVEL)
            .unwrap_or_else(|| quicknote_core::default_log_level().to_string());

        Ok(Self {
            bot_token,
            db_path: base_dir.join(db_path),
            log_level,
            log_dir: base_dir.join(log_dir),
        })
    }
}
