// SPDX-FileCopyrightText: 2026 Wigstock Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Wigstock inventory tool.
//!
//! This crate provides the error type, the domain types (products, users,
//! stock rankings), the dynamic row/value representation returned by generic
//! queries, and the two seams every other crate plugs into: the
//! [`StorageBackend`] capability trait and the [`ErrorSink`] logging
//! collaborator.

pub mod error;
pub mod sink;
pub mod traits;
pub mod types;
pub mod value;

// Re-export key items at crate root for ergonomic imports.
pub use error::WigstockError;
pub use sink::{ERROR_TARGET, MemorySink, TracingSink};
pub use traits::{ErrorSink, StorageBackend};
pub use types::{BackendKind, ExecOutcome, HealthStatus, NewProduct, NewUser, Product, StockLevel};
pub use value::{Row, Value};
