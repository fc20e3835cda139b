// SPDX-FileCopyrightText: 2026 Regidesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message intent routing for the registrar helpdesk.
//!
//! The router walks a fixed priority chain over each chat turn: greeting,
//! ticket-offer confirmation, department lookup, FAQ match, ticket status,
//! implicit ticket need, then the completion-provider fallback. The first
//! matching stage produces the reply.

pub mod classify;
pub mod extract;
pub mod intake;
pub mod router;

#[cfg(test)]
mod testing;

pub use intake::TicketIntake;
pub use router::IntentRouter;
