// SPDX-FileCopyrightText: 2026 Wigstock Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage backend trait for the embedded and client/server engines.

use crate::error::WigstockError;
use crate::types::{BackendKind, ExecOutcome, HealthStatus};
use crate::value::{Row, Value};

/// The capability set every storage engine provides.
///
/// A backend owns at most one connection. It starts disconnected, and every
/// statement method returns [`WigstockError::NotConnected`] until
/// [`connect`](StorageBackend::connect) succeeds. Backends report failures as
/// values and never log; logging is the gateway's job.
///
/// Calls are blocking and serial. Implementations are `Send` so a gateway can
/// move between threads, but sharing one requires an external mutex.
pub trait StorageBackend: Send {
    /// Which engine this backend talks to.
    fn kind(&self) -> BackendKind;

    fn is_connected(&self) -> bool;

    /// Open the connection. On failure the backend stays disconnected.
    fn connect(&mut self) -> Result<(), WigstockError>;

    /// Release the connection. A no-op when already disconnected.
    fn disconnect(&mut self) -> Result<(), WigstockError>;

    /// Create the `products` and `users` tables if they do not exist.
    ///
    /// Safe to call on every startup.
    fn bootstrap_schema(&mut self) -> Result<(), WigstockError>;

    /// Run one parameterized write in its own transaction.
    ///
    /// Commits on success. On failure the transaction is rolled back before
    /// the error is returned, so nothing from the failed statement persists.
    fn execute(&mut self, sql: &str, params: &[Value]) -> Result<ExecOutcome, WigstockError>;

    /// Run one parameterized read and collect every row.
    fn query(&mut self, sql: &str, params: &[Value]) -> Result<Vec<Row>, WigstockError>;

    /// Run a trivial query against the open connection.
    fn health_check(&mut self) -> Result<HealthStatus, WigstockError> {
        if !self.is_connected() {
            return Ok(HealthStatus::Unhealthy("not connected".into()));
        }
        match self.query("SELECT 1", &[]) {
            Ok(_) => Ok(HealthStatus::Healthy),
            Err(e) => Ok(HealthStatus::Unhealthy(e.to_string())),
        }
    }
}
