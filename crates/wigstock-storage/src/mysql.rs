// SPDX-FileCopyrightText: 2026 Wigstock Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! MySQL / MariaDB implementation of the StorageBackend trait.
//!
//! Holds a single `sqlx` connection and a private current-thread runtime that
//! drives it, so callers see the same blocking interface as the embedded
//! backend. Must not be called from inside another tokio runtime.

use std::time::Duration;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use secrecy::{ExposeSecret, SecretString};
use sqlx::mysql::{MySql, MySqlArguments, MySqlConnectOptions, MySqlConnection, MySqlRow};
use sqlx::query::Query;
use sqlx::{Column, ConnectOptions, Connection, Row as _, TypeInfo, ValueRef as _};
use tokio::runtime::Runtime;
use tracing::debug;

use wigstock_config::model::MySqlConfig;
use wigstock_core::{BackendKind, ExecOutcome, Row, StorageBackend, Value, WigstockError};

use crate::dialect::Dialect;

/// Connection settings for [`MySqlBackend`].
#[derive(Debug, Clone)]
pub struct MySqlOptions {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: SecretString,
    pub database: String,
    /// `None` waits for the driver's own timeout.
    pub connect_timeout: Option<Duration>,
}

impl From<&MySqlConfig> for MySqlOptions {
    fn from(config: &MySqlConfig) -> Self {
        Self {
            host: config.host.clone(),
            port: config.port,
            user: config.user.clone(),
            password: config.password.clone(),
            database: config.database.clone(),
            connect_timeout: (config.connect_timeout_secs > 0)
                .then(|| Duration::from_secs(config.connect_timeout_secs)),
        }
    }
}

/// Client/server storage engine holding at most one connection.
pub struct MySqlBackend {
    options: MySqlOptions,
    runtime: Option<Runtime>,
    conn: Option<MySqlConnection>,
}

impl MySqlBackend {
    /// Create a disconnected backend. No socket is opened until
    /// [`StorageBackend::connect`] is called.
    pub fn new(options: MySqlOptions) -> Self {
        Self {
            options,
            runtime: None,
            conn: None,
        }
    }

    fn connect_options(&self) -> MySqlConnectOptions {
        MySqlConnectOptions::new()
            .host(&self.options.host)
            .port(self.options.port)
            .username(&self.options.user)
            .password(self.options.password.expose_secret())
            .charset("utf8mb4")
    }

    fn parts(&mut self) -> Result<(&Runtime, &mut MySqlConnection), WigstockError> {
        match (self.runtime.as_ref(), self.conn.as_mut()) {
            (Some(runtime), Some(conn)) => Ok((runtime, conn)),
            _ => Err(WigstockError::NotConnected),
        }
    }
}

impl StorageBackend for MySqlBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::MySql
    }

    fn is_connected(&self) -> bool {
        self.conn.is_some()
    }

    fn connect(&mut self) -> Result<(), WigstockError> {
        if self.conn.is_some() {
            return Ok(());
        }

        let connection_err = |e: sqlx::Error| WigstockError::connection(BackendKind::MySql, e);
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| WigstockError::connection(BackendKind::MySql, e))?;

        let options = self.connect_options();
        let database = Dialect::MySql.quote(&self.options.database);
        let timeout = self.options.connect_timeout;

        let conn = runtime.block_on(async {
            let mut conn = match timeout {
                Some(limit) => tokio::time::timeout(limit, options.connect())
                    .await
                    .map_err(|_| {
                        WigstockError::connection(
                            BackendKind::MySql,
                            format!("timed out after {}s", limit.as_secs()),
                        )
                    })?
                    .map_err(connection_err)?,
                None => options.connect().await.map_err(connection_err)?,
            };

            // The database cannot be named at connect time until it exists.
            let create = format!("CREATE DATABASE IF NOT EXISTS {database}");
            sqlx::raw_sql(&create)
                .execute(&mut conn)
                .await
                .map_err(connection_err)?;
            let select = format!("USE {database}");
            sqlx::raw_sql(&select)
                .execute(&mut conn)
                .await
                .map_err(connection_err)?;

            Ok::<_, WigstockError>(conn)
        })?;

        self.runtime = Some(runtime);
        self.conn = Some(conn);
        debug!(
            host = %self.options.host,
            port = self.options.port,
            database = %self.options.database,
            "mysql connection opened"
        );
        Ok(())
    }

    fn disconnect(&mut self) -> Result<(), WigstockError> {
        let conn = self.conn.take();
        let runtime = self.runtime.take();
        let (Some(conn), Some(runtime)) = (conn, runtime) else {
            return Ok(());
        };
        runtime
            .block_on(conn.close())
            .map_err(WigstockError::statement)?;
        debug!(host = %self.options.host, "mysql connection closed");
        Ok(())
    }

    fn bootstrap_schema(&mut self) -> Result<(), WigstockError> {
        let (runtime, conn) = self.parts()?;
        runtime.block_on(async {
            // DDL commits implicitly on MySQL, so there is no surrounding transaction.
            for statement in Dialect::MySql.schema() {
                sqlx::raw_sql(&statement)
                    .execute(&mut *conn)
                    .await
                    .map_err(map_mysql_err)?;
            }
            Ok(())
        })
    }

    fn execute(&mut self, sql: &str, params: &[Value]) -> Result<ExecOutcome, WigstockError> {
        let (runtime, conn) = self.parts()?;
        runtime.block_on(async {
            let mut tx = conn.begin().await.map_err(map_mysql_err)?;
            let result = bind(sqlx::query(sql), params).execute(&mut *tx).await;
            match result {
                Ok(done) => {
                    tx.commit().await.map_err(map_mysql_err)?;
                    let id = done.last_insert_id();
                    Ok(ExecOutcome {
                        rows_affected: done.rows_affected(),
                        last_insert_id: (id != 0).then(|| id as i64),
                    })
                }
                Err(e) => {
                    // A failed rollback leaves nothing new to report; the statement error wins.
                    let _ = tx.rollback().await;
                    Err(map_mysql_err(e))
                }
            }
        })
    }

    fn query(&mut self, sql: &str, params: &[Value]) -> Result<Vec<Row>, WigstockError> {
        let (runtime, conn) = self.parts()?;
        runtime.block_on(async {
            let rows = bind(sqlx::query(sql), params)
                .fetch_all(&mut *conn)
                .await
                .map_err(map_mysql_err)?;
            rows.iter().map(decode_row).collect()
        })
    }
}

impl Drop for MySqlBackend {
    fn drop(&mut self) {
        if let Err(e) = self.disconnect() {
            debug!(error = %e, "mysql disconnect on drop failed");
        }
    }
}

fn bind<'q>(
    mut query: Query<'q, MySql, MySqlArguments>,
    params: &'q [Value],
) -> Query<'q, MySql, MySqlArguments> {
    for param in params {
        query = match param {
            Value::Null => query.bind(None::<String>),
            Value::Integer(i) => query.bind(*i),
            Value::Real(f) => query.bind(*f),
            Value::Text(s) => query.bind(s.as_str()),
        };
    }
    query
}

fn decode_row(row: &MySqlRow) -> Result<Row, WigstockError> {
    let mut decoded = Row::new();
    for (idx, column) in row.columns().iter().enumerate() {
        let value = decode_value(row, idx, column.type_info().name()).map_err(|e| {
            WigstockError::Decode(format!("column `{}`: {e}", column.name()))
        })?;
        decoded.push(column.name(), value);
    }
    Ok(decoded)
}

fn decode_value(row: &MySqlRow, idx: usize, type_name: &str) -> Result<Value, sqlx::Error> {
    if row.try_get_raw(idx)?.is_null() {
        return Ok(Value::Null);
    }

    let value = match type_name {
        "BOOLEAN" | "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" => {
            Value::Integer(row.try_get::<i64, _>(idx)?)
        }
        name if name.ends_with("UNSIGNED") => {
            let n = row.try_get::<u64, _>(idx)?;
            i64::try_from(n).map_or(Value::Real(n as f64), Value::Integer)
        }
        "DECIMAL" => {
            let d = row.try_get::<Decimal, _>(idx)?;
            d.to_f64()
                .map_or_else(|| Value::Text(d.to_string()), Value::Real)
        }
        "FLOAT" => Value::Real(f64::from(row.try_get::<f32, _>(idx)?)),
        "DOUBLE" => Value::Real(row.try_get::<f64, _>(idx)?),
        "BINARY" | "VARBINARY" | "TINYBLOB" | "BLOB" | "MEDIUMBLOB" | "LONGBLOB" => {
            let bytes = row.try_get::<Vec<u8>, _>(idx)?;
            Value::Text(String::from_utf8_lossy(&bytes).into_owned())
        }
        _ => Value::Text(row.try_get::<String, _>(idx)?),
    };
    Ok(value)
}

/// Map an sqlx error, singling out unique-key collisions.
fn map_mysql_err(e: sqlx::Error) -> WigstockError {
    if let Some(db) = e.as_database_error() {
        if db.is_unique_violation() {
            return WigstockError::Duplicate {
                detail: db.message().to_string(),
            };
        }
    }
    WigstockError::statement(e)
}
