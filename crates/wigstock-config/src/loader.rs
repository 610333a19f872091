// SPDX-FileCopyrightText: 2026 Wigstock Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./wigstock.toml` > `~/.config/wigstock/wigstock.toml` > `/etc/wigstock/wigstock.toml`
//! with environment variable overrides via `WIGSTOCK_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::WigstockConfig;

/// System-wide config file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/wigstock/wigstock.toml";

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "wigstock.toml";

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/wigstock/wigstock.toml` (system-wide)
/// 3. `~/.config/wigstock/wigstock.toml` (user XDG config)
/// 4. `./wigstock.toml` (local directory)
/// 5. `WIGSTOCK_*` environment variables
pub fn load_config() -> Result<WigstockConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env vars).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<WigstockConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(WigstockConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<WigstockConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(WigstockConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Path of the per-user config file, if the platform has a config directory.
pub fn user_config_path() -> Option<std::path::PathBuf> {
    dirs::config_dir().map(|d| d.join("wigstock").join(LOCAL_CONFIG_FILE))
}

/// Build the Figment used internally for config loading (exposed for diagnostic use).
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(WigstockConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_FILE))
        .merge(env_provider())
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` because key names contain
/// underscores: `WIGSTOCK_MYSQL_CONNECT_TIMEOUT_SECS` must map to
/// `storage.mysql.connect_timeout_secs`.
fn env_provider() -> Env {
    Env::prefixed("WIGSTOCK_").map(|key| map_env_key(key.as_str()).into())
}

/// Map a prefix-stripped env var name onto its config path.
///
/// Figment hands over the name in its original case (`MYSQL_PASSWORD`), so it
/// is lowercased before matching. Unrecognized names pass through so
/// `deny_unknown_fields` reports them.
pub fn map_env_key(key: &str) -> String {
    let key = key.to_ascii_lowercase();
    if let Some(rest) = key.strip_prefix("storage_") {
        format!("storage.{rest}")
    } else if let Some(rest) = key.strip_prefix("sqlite_") {
        format!("storage.sqlite.{rest}")
    } else if let Some(rest) = key.strip_prefix("mysql_") {
        format!("storage.mysql.{rest}")
    } else if let Some(rest) = key.strip_prefix("logging_") {
        format!("logging.{rest}")
    } else {
        key
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_keys_map_to_nested_paths() {
        assert_eq!(map_env_key("storage_backend"), "storage.backend");
        assert_eq!(map_env_key("sqlite_path"), "storage.sqlite.path");
        assert_eq!(map_env_key("sqlite_busy_timeout_ms"), "storage.sqlite.busy_timeout_ms");
        assert_eq!(map_env_key("mysql_password"), "storage.mysql.password");
        assert_eq!(
            map_env_key("mysql_connect_timeout_secs"),
            "storage.mysql.connect_timeout_secs"
        );
        assert_eq!(map_env_key("logging_error_log"), "logging.error_log");
    }

    #[test]
    fn env_keys_are_matched_regardless_of_case() {
        assert_eq!(map_env_key("MYSQL_PASSWORD"), "storage.mysql.password");
        assert_eq!(map_env_key("STORAGE_BACKEND"), "storage.backend");
        assert_eq!(map_env_key("Logging_Level"), "logging.level");
        assert_eq!(map_env_key("BOGUS_KEY"), "bogus_key");
    }

    #[test]
    fn empty_string_yields_defaults() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config.logging.level, "info");
    }
}
