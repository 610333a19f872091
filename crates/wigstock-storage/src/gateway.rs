// SPDX-FileCopyrightText: 2026 Wigstock Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The persistence gateway: one connection, one dialect, one error sink.
//!
//! Every failure is reported to the injected [`ErrorSink`] and then returned
//! as a value. Reads degrade to empty results, writes return the error, and
//! nothing panics.

use std::sync::Arc;

use tracing::debug;

use wigstock_config::model::StorageConfig;
use wigstock_core::{
    BackendKind, ErrorSink, ExecOutcome, HealthStatus, Row, StorageBackend, Value, WigstockError,
};

use crate::dialect::Dialect;
use crate::mysql::{MySqlBackend, MySqlOptions};
use crate::sqlite::{SqliteBackend, SqliteOptions};

/// Gateway over a single storage backend.
///
/// Starts disconnected. Operations issued before [`connect`](Gateway::connect)
/// fail fast with [`WigstockError::NotConnected`]; the gateway never connects
/// on its own. Dropping the gateway disconnects it.
pub struct Gateway {
    backend: Box<dyn StorageBackend>,
    dialect: Dialect,
    sink: Arc<dyn ErrorSink>,
}

impl Gateway {
    pub fn new(backend: Box<dyn StorageBackend>, sink: Arc<dyn ErrorSink>) -> Self {
        let dialect = Dialect::for_backend(backend.kind());
        Self {
            backend,
            dialect,
            sink,
        }
    }

    /// Build a disconnected gateway for the backend selected in `config`.
    pub fn from_config(config: &StorageConfig, sink: Arc<dyn ErrorSink>) -> Self {
        let backend: Box<dyn StorageBackend> = match config.backend {
            BackendKind::Sqlite => Box::new(SqliteBackend::new(SqliteOptions::from(&config.sqlite))),
            BackendKind::MySql => Box::new(MySqlBackend::new(MySqlOptions::from(&config.mysql))),
        };
        Self::new(backend, sink)
    }

    pub fn kind(&self) -> BackendKind {
        self.backend.kind()
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn is_connected(&self) -> bool {
        self.backend.is_connected()
    }

    /// Open the connection. On failure the gateway stays disconnected and
    /// no retry is attempted.
    pub fn connect(&mut self) -> Result<(), WigstockError> {
        self.backend
            .connect()
            .map_err(|e| self.report(&format!("connect({})", self.kind()), e))?;
        debug!(backend = %self.kind(), "storage connected");
        Ok(())
    }

    /// Release the connection. Calling it again is a no-op.
    pub fn disconnect(&mut self) {
        if !self.backend.is_connected() {
            return;
        }
        match self.backend.disconnect() {
            Ok(()) => debug!(backend = %self.kind(), "storage disconnected"),
            Err(e) => {
                self.report(&format!("disconnect({})", self.kind()), e);
            }
        }
    }

    /// Create the `products` and `users` tables if missing.
    pub fn bootstrap_schema(&mut self) -> Result<(), WigstockError> {
        self.backend
            .bootstrap_schema()
            .map_err(|e| self.report("bootstrap_schema", e))?;
        debug!(backend = %self.kind(), "schema ready");
        Ok(())
    }

    /// Run one parameterized write; committed on success, rolled back on failure.
    pub fn execute(&mut self, sql: &str, params: &[Value]) -> Result<ExecOutcome, WigstockError> {
        self.execute_as(&format!("execute `{sql}`"), sql, params)
    }

    /// Run one parameterized read. Empty on no rows and on failure.
    pub fn query_all(&mut self, sql: &str, params: &[Value]) -> Vec<Row> {
        self.query_as(&format!("query `{sql}`"), sql, params)
    }

    /// Like [`query_all`](Gateway::query_all), keeping only the first row.
    pub fn query_one(&mut self, sql: &str, params: &[Value]) -> Option<Row> {
        self.query_all(sql, params).into_iter().next()
    }

    pub fn health_check(&mut self) -> HealthStatus {
        match self.backend.health_check() {
            Ok(status) => status,
            Err(e) => HealthStatus::Unhealthy(self.report("health_check", e).to_string()),
        }
    }

    pub(crate) fn execute_as(
        &mut self,
        operation: &str,
        sql: &str,
        params: &[Value],
    ) -> Result<ExecOutcome, WigstockError> {
        self.backend
            .execute(sql, params)
            .map_err(|e| self.report(operation, e))
    }

    pub(crate) fn query_as(&mut self, operation: &str, sql: &str, params: &[Value]) -> Vec<Row> {
        match self.backend.query(sql, params) {
            Ok(rows) => rows,
            Err(e) => {
                self.report(operation, e);
                Vec::new()
            }
        }
    }

    /// Map every row onto `T`, or log and return nothing if any row is malformed.
    pub(crate) fn decode_all<T>(&self, operation: &str, rows: &[Row]) -> Vec<T>
    where
        T: for<'a> TryFrom<&'a Row, Error = WigstockError>,
    {
        match rows.iter().map(T::try_from).collect::<Result<Vec<T>, _>>() {
            Ok(items) => items,
            Err(e) => {
                self.report(operation, e);
                Vec::new()
            }
        }
    }

    /// Send `err` to the sink, prefixed with the failing operation, and hand it back.
    pub(crate) fn report(&self, operation: &str, err: WigstockError) -> WigstockError {
        self.sink.log_error(&format!("{operation}: {err}"));
        err
    }
}

impl Drop for Gateway {
    fn drop(&mut self) {
        self.disconnect();
    }
}
