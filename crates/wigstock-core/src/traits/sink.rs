// SPDX-FileCopyrightText: 2026 Wigstock Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error log collaborator.

/// Receives a message for every failure the gateway catches.
///
/// Implementations must never panic and must not block for long: the gateway
/// calls the sink inline and ignores the outcome.
pub trait ErrorSink: Send + Sync {
    fn log_error(&self, message: &str);
}
