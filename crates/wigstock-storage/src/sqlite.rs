// SPDX-FileCopyrightText: 2026 Wigstock Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedded SQLite implementation of the StorageBackend trait.

use std::path::{Path, PathBuf};
use std::time::Duration;

use rusqlite::types::ValueRef;
use rusqlite::{Connection, ErrorCode, ffi, params_from_iter};
use tracing::debug;

use wigstock_config::model::SqliteConfig;
use wigstock_core::{BackendKind, ExecOutcome, Row, StorageBackend, Value, WigstockError};

use crate::dialect::Dialect;

/// Path that opens a private, non-persistent database.
pub const MEMORY_PATH: &str = ":memory:";

/// Connection settings for [`SqliteBackend`].
#[derive(Debug, Clone)]
pub struct SqliteOptions {
    pub path: PathBuf,
    pub wal_mode: bool,
    pub busy_timeout: Duration,
}

impl SqliteOptions {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            wal_mode: true,
            busy_timeout: Duration::from_millis(5000),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(MEMORY_PATH)
    }

    fn is_memory(&self) -> bool {
        self.path == Path::new(MEMORY_PATH)
    }
}

impl From<&SqliteConfig> for SqliteOptions {
    fn from(config: &SqliteConfig) -> Self {
        Self {
            path: PathBuf::from(&config.path),
            wal_mode: config.wal_mode,
            busy_timeout: Duration::from_millis(config.busy_timeout_ms),
        }
    }
}

/// SQLite-backed storage engine holding at most one connection.
pub struct SqliteBackend {
    options: SqliteOptions,
    conn: Option<Connection>,
}

impl SqliteBackend {
    /// Create a disconnected backend. Nothing touches the filesystem until
    /// [`StorageBackend::connect`] is called.
    pub fn new(options: SqliteOptions) -> Self {
        Self {
            options,
            conn: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.options.path
    }

    fn conn_mut(&mut self) -> Result<&mut Connection, WigstockError> {
        self.conn.as_mut().ok_or(WigstockError::NotConnected)
    }

    fn open(&self) -> Result<Connection, WigstockError> {
        let connection_err = |e: rusqlite::Error| WigstockError::connection(BackendKind::Sqlite, e);

        if self.options.is_memory() {
            let conn = Connection::open_in_memory().map_err(connection_err)?;
            conn.execute_batch("PRAGMA foreign_keys = ON;")
                .map_err(connection_err)?;
            return Ok(conn);
        }

        if let Some(parent) = self.options.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    WigstockError::connection(
                        BackendKind::Sqlite,
                        format!("cannot create {}: {e}", parent.display()),
                    )
                })?;
            }
        }

        let conn = Connection::open(&self.options.path).map_err(connection_err)?;
        conn.busy_timeout(self.options.busy_timeout)
            .map_err(connection_err)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .map_err(connection_err)?;
        if self.options.wal_mode {
            conn.execute_batch("PRAGMA journal_mode = WAL;")
                .map_err(connection_err)?;
        }

        // Opening is lazy; reading the catalog rejects files that are not databases.
        conn.query_row("SELECT count(*) FROM sqlite_master", [], |row| {
            row.get::<_, i64>(0)
        })
        .map_err(connection_err)?;

        Ok(conn)
    }
}

impl StorageBackend for SqliteBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Sqlite
    }

    fn is_connected(&self) -> bool {
        self.conn.is_some()
    }

    fn connect(&mut self) -> Result<(), WigstockError> {
        if self.conn.is_some() {
            return Ok(());
        }
        let conn = self.open()?;
        self.conn = Some(conn);
        debug!(path = %self.options.path.display(), "sqlite connection opened");
        Ok(())
    }

    fn disconnect(&mut self) -> Result<(), WigstockError> {
        let Some(conn) = self.conn.take() else {
            return Ok(());
        };
        conn.close().map_err(|(_, e)| WigstockError::statement(e))?;
        debug!(path = %self.options.path.display(), "sqlite connection closed");
        Ok(())
    }

    fn bootstrap_schema(&mut self) -> Result<(), WigstockError> {
        let conn = self.conn_mut()?;
        let tx = conn.transaction().map_err(map_sqlite_err)?;
        for statement in Dialect::Sqlite.schema() {
            tx.execute_batch(&statement).map_err(map_sqlite_err)?;
        }
        tx.commit().map_err(map_sqlite_err)
    }

    fn execute(&mut self, sql: &str, params: &[Value]) -> Result<ExecOutcome, WigstockError> {
        let conn = self.conn_mut()?;
        let tx = conn.transaction().map_err(map_sqlite_err)?;

        let result = tx
            .prepare(sql)
            .and_then(|mut stmt| stmt.execute(params_from_iter(params.iter().map(to_sql))));

        match result {
            Ok(changed) => {
                let last_insert_id = is_insert(sql).then(|| tx.last_insert_rowid());
                tx.commit().map_err(map_sqlite_err)?;
                Ok(ExecOutcome {
                    rows_affected: changed as u64,
                    last_insert_id,
                })
            }
            Err(e) => {
                // A failed rollback leaves nothing new to report; the statement error wins.
                let _ = tx.rollback();
                Err(map_sqlite_err(e))
            }
        }
    }

    fn query(&mut self, sql: &str, params: &[Value]) -> Result<Vec<Row>, WigstockError> {
        let conn = self.conn_mut()?;
        let mut stmt = conn.prepare(sql).map_err(map_sqlite_err)?;
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

        let mut rows = stmt
            .query(params_from_iter(params.iter().map(to_sql)))
            .map_err(map_sqlite_err)?;

        let mut out = Vec::new();
        while let Some(row) = rows.next().map_err(map_sqlite_err)? {
            let mut decoded = Row::new();
            for (idx, name) in columns.iter().enumerate() {
                let value = row.get_ref(idx).map_err(map_sqlite_err)?;
                decoded.push(name.clone(), from_sql(value));
            }
            out.push(decoded);
        }
        Ok(out)
    }
}

fn to_sql(value: &Value) -> rusqlite::types::Value {
    match value {
        Value::Null => rusqlite::types::Value::Null,
        Value::Integer(i) => rusqlite::types::Value::Integer(*i),
        Value::Real(f) => rusqlite::types::Value::Real(*f),
        Value::Text(s) => rusqlite::types::Value::Text(s.clone()),
    }
}

fn from_sql(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::Integer(i),
        ValueRef::Real(f) => Value::Real(f),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            Value::Text(String::from_utf8_lossy(bytes).into_owned())
        }
    }
}

/// True when the statement's leading keyword inserts rows.
///
/// `last_insert_rowid()` is per connection, not per statement, so it is only
/// meaningful right after an insert.
fn is_insert(sql: &str) -> bool {
    let keyword = sql
        .trim_start()
        .split(|c: char| c.is_whitespace() || c == '(')
        .next()
        .unwrap_or_default();
    keyword.eq_ignore_ascii_case("INSERT") || keyword.eq_ignore_ascii_case("REPLACE")
}

/// Map a rusqlite error, singling out primary-key and unique collisions.
pub(crate) fn map_sqlite_err(e: rusqlite::Error) -> WigstockError {
    if let rusqlite::Error::SqliteFailure(failure, message) = &e {
        let duplicate = failure.code == ErrorCode::ConstraintViolation
            && (failure.extended_code == ffi::SQLITE_CONSTRAINT_PRIMARYKEY
                || failure.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE);
        if duplicate {
            return WigstockError::Duplicate {
                detail: message.clone().unwrap_or_else(|| failure.to_string()),
            };
        }
    }
    WigstockError::statement(e)
}
