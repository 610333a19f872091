// SPDX-FileCopyrightText: 2026 Wigstock Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistence layer for the Wigstock inventory manager.
//!
//! A [`Gateway`] owns one connection to either an embedded SQLite file or a
//! MySQL server, builds dialect-correct statements for the `products` and
//! `users` tables, and reports every failure to an injected error sink.

pub mod dialect;
pub mod gateway;
pub mod mysql;
pub mod queries;
pub mod sqlite;

pub use dialect::Dialect;
pub use gateway::Gateway;
pub use mysql::{MySqlBackend, MySqlOptions};
pub use queries::products::SALES_RANKING_LIMIT;
pub use sqlite::{SqliteBackend, SqliteOptions};
