// SPDX-FileCopyrightText: 2026 Wigstock Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared by the storage crate and its callers.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::WigstockError;
use crate::value::Row;

/// Which storage engine a backend talks to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Embedded, file-based SQLite.
    #[default]
    Sqlite,
    /// Client/server MySQL or MariaDB.
    MySql,
}

/// Health status reported by backend health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Backend answered a trivial query.
    Healthy,
    /// Backend is not operational.
    Unhealthy(String),
}

/// Result of a write statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExecOutcome {
    /// Rows inserted, updated or deleted.
    pub rows_affected: u64,
    /// Key generated by the last insert, when the statement produced one.
    pub last_insert_id: Option<i64>,
}

/// A stored product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub stock: u32,
}

/// Mutable product fields, used both to insert and to fully replace a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub stock: u32,
}

impl NewProduct {
    /// Product without a description.
    pub fn new(name: impl Into<String>, price: f64, stock: u32) -> Self {
        Self {
            name: name.into(),
            description: None,
            price,
            stock,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// One entry of the stock ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockLevel {
    pub name: String,
    pub stock: u32,
}

/// A user account to register.
///
/// The password is stored as given. Existing rows hold plaintext passwords and
/// logins compare the submitted value byte for byte, so it is never hashed here.
#[derive(Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub password: String,
}

impl NewUser {
    pub fn new(
        email: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser")
            .field("email", &self.email)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl TryFrom<&Row> for Product {
    type Error = WigstockError;

    fn try_from(row: &Row) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.integer("id")?,
            name: row.text("name")?,
            description: row.opt_text("description")?,
            price: row.real("price")?,
            stock: row.count("stock")?,
        })
    }
}

impl TryFrom<&Row> for StockLevel {
    type Error = WigstockError;

    fn try_from(row: &Row) -> Result<Self, Self::Error> {
        Ok(Self {
            name: row.text("name")?,
            stock: row.count("stock")?,
        })
    }
}
