// SPDX-FileCopyrightText: 2026 Wigstock Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as non-empty paths, usable host names, and safe database identifiers.

use wigstock_core::BackendKind;

use crate::diagnostic::ConfigError;
use crate::model::WigstockConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Only the section of the selected backend is checked. Returns `Ok(())` if
/// all validations pass, or `Err(Vec<ConfigError>)` with all collected
/// validation errors (does not fail fast).
pub fn validate_config(config: &WigstockConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    match config.storage.backend {
        BackendKind::Sqlite => {
            if config.storage.sqlite.path.trim().is_empty() {
                errors.push(validation("storage.sqlite.path must not be empty"));
            }
        }
        BackendKind::MySql => {
            let mysql = &config.storage.mysql;
            let host = mysql.host.trim();
            if host.is_empty() {
                errors.push(validation("storage.mysql.host must not be empty"));
            } else {
                let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
                let is_valid_hostname = host
                    .chars()
                    .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
                if !is_valid_ip && !is_valid_hostname {
                    errors.push(validation(format!(
                        "storage.mysql.host `{host}` is not a valid IP address or hostname"
                    )));
                }
            }

            if mysql.port == 0 {
                errors.push(validation("storage.mysql.port must not be 0"));
            }

            if mysql.user.trim().is_empty() {
                errors.push(validation("storage.mysql.user must not be empty"));
            }

            // The name is spliced into CREATE DATABASE, which cannot take a bound parameter.
            if mysql.database.is_empty() {
                errors.push(validation("storage.mysql.database must not be empty"));
            } else if !is_safe_identifier(&mysql.database) {
                errors.push(validation(format!(
                    "storage.mysql.database `{}` may only contain letters, digits, `_` and `$`",
                    mysql.database
                )));
            }
        }
    }

    if !LOG_LEVELS.contains(&config.logging.level.to_ascii_lowercase().as_str()) {
        errors.push(validation(format!(
            "logging.level `{}` must be one of: {}",
            config.logging.level,
            LOG_LEVELS.join(", ")
        )));
    }

    if config.logging.error_log.trim().is_empty() {
        errors.push(validation("logging.error_log must not be empty"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// True if `name` can be used as an unquoted MySQL database name.
pub fn is_safe_identifier(name: &str) -> bool {
    name.len() <= 64
        && !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

fn validation(message: impl Into<String>) -> ConfigError {
    ConfigError::Validation {
        message: message.into(),
    }
}
