// SPDX-FileCopyrightText: 2026 Regidesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory test doubles for router unit tests.

use std::io;
use std::sync::Mutex;

use async_trait::async_trait;

use regidesk_core::{
    AdapterType, CompletionProvider, CompletionRequest, HealthStatus, NewTicket,
    PluginAdapter, RegideskError, StatBucket, StatDimension, Ticket, TicketFilter,
    TicketStatus, TicketStore, TicketUpdate,
};

/// Ticket store backed by a `Vec`. Numbers are sequential for predictable
/// assertions.
#[derive(Default)]
pub struct MockTicketStore {
    tickets: Mutex<Vec<Ticket>>,
    fail: bool,
}

impl MockTicketStore {
    /// A store whose every operation fails with a storage error.
    pub fn failing() -> Self {
        Self {
            tickets: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    /// Pre-load a ticket, as if created on an earlier turn.
    pub fn seed(&self, ticket: Ticket) {
        self.tickets.lock().unwrap().push(ticket);
    }

    fn check(&self) -> Result<(), RegideskError> {
        if self.fail {
            Err(RegideskError::Storage {
                source: Box::new(io::Error::other("mock store failure")),
            })
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl PluginAdapter for MockTicketStore {
    fn name(&self) -> &str {
        "mock-ticket-store"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 0, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, RegideskError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), RegideskError> {
        Ok(())
    }
}

#[async_trait]
impl TicketStore for MockTicketStore {
    async fn create_ticket(&self, new: &NewTicket) -> Result<Ticket, RegideskError> {
        self.check()?;
        let mut tickets = self.tickets.lock().unwrap();
        let seq = tickets.len() + 1;
        let ticket = Ticket {
            id: format!("id-{seq}"),
            ticket_number: format!("TICKET-20260830-{seq:04}"),
            title: new.title.clone(),
            description: new.description.clone(),
            category: new.category,
            priority: new.priority,
            status: TicketStatus::Pending,
            created_by: new.created_by.clone(),
            assigned_to: None,
            request_details: new.request_details.clone(),
            resolution: None,
            created_at: "2026-08-30T00:00:00.000Z".into(),
            updated_at: "2026-08-30T00:00:00.000Z".into(),
        };
        tickets.push(ticket.clone());
        Ok(ticket)
    }

    async fn find_tickets(&self, filter: &TicketFilter) -> Result<Vec<Ticket>, RegideskError> {
        self.check()?;
        let tickets = self.tickets.lock().unwrap();
        let mut matched: Vec<Ticket> = tickets
            .iter()
            .filter(|t| {
                filter
                    .created_by
                    .as_ref()
                    .is_none_or(|u| &t.created_by == u)
                    && filter
                        .ticket_number
                        .as_ref()
                        .is_none_or(|n| &t.ticket_number == n)
                    && filter.status.is_none_or(|s| t.status == s)
                    && filter.category.is_none_or(|c| t.category == c)
                    && filter.priority.is_none_or(|p| t.priority == p)
            })
            .cloned()
            .collect();
        matched.reverse();
        if let Some(limit) = filter.limit {
            matched.truncate(limit as usize);
        }
        Ok(matched)
    }

    async fn count_tickets(&self, filter: &TicketFilter) -> Result<u64, RegideskError> {
        let mut unbounded = filter.clone();
        unbounded.limit = None;
        unbounded.offset = None;
        Ok(self.find_tickets(&unbounded).await?.len() as u64)
    }

    async fn get_ticket(&self, ticket_number: &str) -> Result<Option<Ticket>, RegideskError> {
        self.check()?;
        let tickets = self.tickets.lock().unwrap();
        Ok(tickets
            .iter()
            .find(|t| t.ticket_number == ticket_number)
            .cloned())
    }

    async fn update_ticket(
        &self,
        ticket_number: &str,
        update: &TicketUpdate,
    ) -> Result<Option<Ticket>, RegideskError> {
        self.check()?;
        let mut tickets = self.tickets.lock().unwrap();
        let Some(ticket) = tickets.iter_mut().find(|t| t.ticket_number == ticket_number)
        else {
            return Ok(None);
        };
        if let Some(status) = update.status {
            ticket.status = status;
        }
        if let Some(resolution) = &update.resolution {
            ticket.resolution = Some(resolution.clone());
        }
        if let Some(assigned_to) = &update.assigned_to {
            ticket.assigned_to = Some(assigned_to.clone());
        }
        Ok(Some(ticket.clone()))
    }

    async fn count_by(&self, dimension: StatDimension) -> Result<Vec<StatBucket>, RegideskError> {
        self.check()?;
        let tickets = self.tickets.lock().unwrap();
        let mut buckets: Vec<StatBucket> = Vec::new();
        for ticket in tickets.iter() {
            let key = match dimension {
                StatDimension::Status => ticket.status.to_string(),
                StatDimension::Category => ticket.category.to_string(),
                StatDimension::Priority => ticket.priority.to_string(),
            };
            match buckets.iter_mut().find(|b| b.key == key) {
                Some(bucket) => bucket.count += 1,
                None => buckets.push(StatBucket { key, count: 1 }),
            }
        }
        Ok(buckets)
    }

    async fn counts_by_day(&self, _days: u32) -> Result<Vec<StatBucket>, RegideskError> {
        self.check()?;
        Ok(Vec::new())
    }

    async fn counts_by_month(&self, _months: u32) -> Result<Vec<StatBucket>, RegideskError> {
        self.check()?;
        Ok(Vec::new())
    }
}

/// Completion provider that returns a canned reply and records the last
/// request it saw.
pub struct MockCompletionProvider {
    reply: Option<String>,
    last: Mutex<Option<CompletionRequest>>,
}

impl MockCompletionProvider {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            last: Mutex::new(None),
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: None,
            last: Mutex::new(None),
        }
    }

    pub fn last_request(&self) -> Option<CompletionRequest> {
        self.last.lock().unwrap().clone()
    }
}

#[async_trait]
impl PluginAdapter for MockCompletionProvider {
    fn name(&self) -> &str {
        "mock-completion-provider"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 0, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, RegideskError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), RegideskError> {
        Ok(())
    }
}

#[async_trait]
impl CompletionProvider for MockCompletionProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<String, RegideskError> {
        *self.last.lock().unwrap() = Some(request);
        match &self.reply {
            Some(reply) => Ok(reply.clone()),
            None => Err(RegideskError::Provider {
                message: "mock provider failure".to_string(),
                source: None,
            }),
        }
    }
}
