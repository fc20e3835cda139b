// SPDX-FileCopyrightText: 2026 Regidesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ticket store trait for persistence backends (SQLite, etc.).

use async_trait::async_trait;

use crate::error::RegideskError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{
    NewTicket, StatBucket, StatDimension, Ticket, TicketFilter, TicketUpdate,
};

/// Adapter for the ticket persistence backend.
///
/// The chat router only creates and reads tickets; the update and
/// aggregation operations serve the admin surface.
#[async_trait]
pub trait TicketStore: PluginAdapter {
    /// Persist a new ticket, generating its identity, ticket number, and
    /// timestamps. Returns the full stored record.
    async fn create_ticket(&self, new: &NewTicket) -> Result<Ticket, RegideskError>;

    /// Find tickets matching a filter, newest first.
    async fn find_tickets(&self, filter: &TicketFilter) -> Result<Vec<Ticket>, RegideskError>;

    /// Count tickets matching a filter (ignores limit/offset).
    async fn count_tickets(&self, filter: &TicketFilter) -> Result<u64, RegideskError>;

    /// Look up a single ticket by its public number.
    async fn get_ticket(&self, ticket_number: &str) -> Result<Option<Ticket>, RegideskError>;

    /// Apply an admin update (status, resolution, assignee) to a ticket.
    /// Returns the updated record, or `None` if the number is unknown.
    async fn update_ticket(
        &self,
        ticket_number: &str,
        update: &TicketUpdate,
    ) -> Result<Option<Ticket>, RegideskError>;

    /// Count tickets grouped by status, category, or priority.
    async fn count_by(&self, dimension: StatDimension) -> Result<Vec<StatBucket>, RegideskError>;

    /// Count tickets created per day over the most recent `days` days
    /// that have any tickets, newest day first.
    async fn counts_by_day(&self, days: u32) -> Result<Vec<StatBucket>, RegideskError>;

    /// Count tickets created per month, newest month first.
    async fn counts_by_month(&self, months: u32) -> Result<Vec<StatBucket>, RegideskError>;
}
