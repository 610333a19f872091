// SPDX-FileCopyrightText: 2026 Wigstock Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for Wigstock.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use std::fmt;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use wigstock_core::BackendKind;

/// Top-level Wigstock configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to a local SQLite database.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct WigstockConfig {
    /// Storage backend selection and connection settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Console and error-log settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Storage backend configuration.
///
/// Both backend sections may be present; only the one named by `backend` is used.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Which engine to connect to.
    #[serde(default)]
    pub backend: BackendKind,

    /// Embedded SQLite settings.
    #[serde(default)]
    pub sqlite: SqliteConfig,

    /// MySQL / MariaDB settings.
    #[serde(default)]
    pub mysql: MySqlConfig,
}

/// Embedded SQLite configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SqliteConfig {
    /// Path to the database file. `:memory:` opens a private in-memory database.
    #[serde(default = "default_sqlite_path")]
    pub path: String,

    /// Enable WAL (Write-Ahead Logging) mode.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,

    /// How long to wait on a locked database before failing, in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            path: default_sqlite_path(),
            wal_mode: default_wal_mode(),
            busy_timeout_ms: default_busy_timeout_ms(),
        }
    }
}

fn default_sqlite_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("wigstock").join("wigstock.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("wigstock.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

fn default_busy_timeout_ms() -> u64 {
    5000
}

/// MySQL / MariaDB configuration.
#[derive(Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MySqlConfig {
    /// Server host name or address.
    #[serde(default = "default_mysql_host")]
    pub host: String,

    /// Server TCP port.
    #[serde(default = "default_mysql_port")]
    pub port: u16,

    /// Account used to log in.
    #[serde(default = "default_mysql_user")]
    pub user: String,

    /// Account password. Prefer `WIGSTOCK_MYSQL_PASSWORD` over writing it to a file.
    ///
    /// Never serialized, so it cannot leak through `Serialized` providers or dumps.
    #[serde(default, skip_serializing)]
    pub password: SecretString,

    /// Database to create (if missing) and select after connecting.
    #[serde(default = "default_mysql_database")]
    pub database: String,

    /// Connect timeout in seconds. `0` waits indefinitely.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl Default for MySqlConfig {
    fn default() -> Self {
        Self {
            host: default_mysql_host(),
            port: default_mysql_port(),
            user: default_mysql_user(),
            password: SecretString::default(),
            database: default_mysql_database(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

impl fmt::Debug for MySqlConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MySqlConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"[REDACTED]")
            .field("database", &self.database)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .finish()
    }
}

fn default_mysql_host() -> String {
    "localhost".to_string()
}

fn default_mysql_port() -> u16 {
    3306
}

fn default_mysql_user() -> String {
    "root".to_string()
}

fn default_mysql_database() -> String {
    "wigstock".to_string()
}

fn default_connect_timeout_secs() -> u64 {
    10
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Console logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// File that receives every ERROR event, appended to across runs.
    #[serde(default = "default_error_log")]
    pub error_log: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            error_log: default_error_log(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_error_log() -> String {
    "error.log".to_string()
}
