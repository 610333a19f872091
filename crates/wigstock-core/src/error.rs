// SPDX-FileCopyrightText: 2026 Wigstock Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for Wigstock.

use thiserror::Error;

use crate::types::BackendKind;

/// The primary error type returned by storage backends and the gateway.
#[derive(Debug, Error)]
pub enum WigstockError {
    /// Configuration errors (missing backend settings, invalid values).
    #[error("configuration error: {0}")]
    Config(String),

    /// The backend could not be reached or refused the connection.
    #[error("connection to {backend} failed: {source}")]
    Connection {
        backend: BackendKind,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A statement failed (malformed SQL, constraint violation, bad arity).
    #[error("statement failed: {source}")]
    Statement {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// An insert collided with an existing primary or unique key.
    #[error("duplicate key: {detail}")]
    Duplicate { detail: String },

    /// An operation was issued while the gateway was disconnected.
    #[error("not connected: call connect() first")]
    NotConnected,

    /// A stored row could not be mapped onto a domain type.
    #[error("row decode error: {0}")]
    Decode(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl WigstockError {
    /// Wrap a driver error as a [`WigstockError::Statement`].
    pub fn statement(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Statement {
            source: source.into(),
        }
    }

    /// Wrap a driver error as a [`WigstockError::Connection`] for `backend`.
    pub fn connection(
        backend: BackendKind,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Connection {
            backend,
            source: source.into(),
        }
    }

    /// True for uniqueness violations.
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Duplicate { .. })
    }
}
