// SPDX-FileCopyrightText: 2026 Regidesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions for backend seams.

pub mod adapter;
pub mod provider;
pub mod store;

pub use adapter::PluginAdapter;
pub use provider::{CompletionProvider, CompletionRequest};
pub use store::TicketStore;
