// SPDX-FileCopyrightText: 2026 Wigstock Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain operations on the gateway, one module per table.
//!
//! Statement text is built per call from the gateway's dialect.

pub mod products;
pub mod users;
