// SPDX-FileCopyrightText: 2026 Wigstock Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! [`ErrorSink`] implementations.

use std::sync::{Mutex, MutexGuard};

use crate::traits::ErrorSink;

/// Target used for every event the tracing sink emits.
pub const ERROR_TARGET: &str = "wigstock::errors";

/// Forwards failures to `tracing` as ERROR events.
///
/// Where the events end up (stderr, `error.log`) is decided by whichever
/// subscriber the process installed.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl ErrorSink for TracingSink {
    fn log_error(&self, message: &str) {
        tracing::error!(target: ERROR_TARGET, "{message}");
    }
}

/// Keeps failures in memory.
///
/// Used by front ends that show the last failure to the operator, and by tests.
#[derive(Debug, Default)]
pub struct MemorySink {
    messages: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<String>> {
        // A poisoned lock still holds valid strings.
        self.messages.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn messages(&self) -> Vec<String> {
        self.lock().clone()
    }

    pub fn last(&self) -> Option<String> {
        self.lock().last().cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}

impl ErrorSink for MemorySink {
    fn log_error(&self, message: &str) {
        self.lock().push(message.to_string());
    }
}
