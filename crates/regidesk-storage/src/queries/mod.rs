// SPDX-FileCopyrightText: 2026 Regidesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed query modules. One module per table or concern.

pub mod stats;
pub mod tickets;
