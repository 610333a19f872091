// SPDX-FileCopyrightText: 2026 Wigstock Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait seams between the gateway, its storage backends, and the error log.

pub mod backend;
pub mod sink;

pub use backend::StorageBackend;
pub use sink::ErrorSink;
