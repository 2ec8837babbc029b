//! Server configuration resolved from environment variables.
//!
//! # Invariants
//! - Blank variables fall back to defaults.
//! - An unparsable bind address is an error, never silently defaulted.

use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

pub const BIND_ADDR_ENV: &str = "TODOS_BIND_ADDR";
pub const DB_PATH_ENV: &str = "TODOS_DB_PATH";
pub const LOG_LEVEL_ENV: &str = "TODOS_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "TODOS_LOG_DIR";

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_DB_FILE_NAME: &str = "todos.sqlite3";
const DEFAULT_LOG_DIR_NAME: &str = "todos-logs";
const IN_MEMORY_DB: &str = ":memory:";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid TODOS_BIND_ADDR `{value}`: {source}")]
    InvalidBindAddr {
        value: String,
        source: std::net::AddrParseError,
    },
}

/// Where the todo table lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbLocation {
    File(PathBuf),
    Memory,
}

impl DbLocation {
    /// `:memory:` selects an in-memory database; anything else is a file path.
    pub fn from_setting(value: &str) -> Self {
        let value = value.trim();
        if value == IN_MEMORY_DB {
            Self::Memory
        } else {
            Self::File(PathBuf::from(value))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub db: DbLocation,
    pub log_level: String,
    pub log_dir: PathBuf,
}

impl ServerConfig {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`, which maps a variable name to its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let bind_raw = read(BIND_ADDR_ENV).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr: SocketAddr = bind_raw
            .parse()
            .map_err(|source| ConfigError::InvalidBindAddr {
                value: bind_raw.clone(),
                source,
            })?;

        let db = read(DB_PATH_ENV)
            .map(|value| DbLocation::from_setting(&value))
            .unwrap_or_else(|| DbLocation::File(std::env::temp_dir().join(DEFAULT_DB_FILE_NAME)));

        let log_level =
            read(LOG_LEVEL_ENV).unwrap_or_else(|| todos_core::default_log_level().to_string());
        let log_dir = read(LOG_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_LOG_DIR_NAME));

        Ok(Self {
            bind_addr,
            db,
            log_level,
            log_dir,
        })
    }
}
