// SPDX-FileCopyrightText: 2026 Regidesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for the Regidesk helpdesk.
//!
//! Exposes the chat endpoint, the admin ticket endpoints, and a public
//! health endpoint, with bearer-token auth per route group.

pub mod admin;
pub mod auth;
pub mod handlers;
pub mod server;

pub use server::{build_app, start_server, GatewayState};
