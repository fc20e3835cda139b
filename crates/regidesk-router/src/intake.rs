// SPDX-FileCopyrightText: 2026 Regidesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ticket intake: turns a free-form message into a persisted ticket.

use std::sync::Arc;

use tracing::info;

use regidesk_core::{
    NewTicket, RegideskError, Ticket, TicketCategory, TicketStore,
};

use crate::extract::{derive_title, detect_priority, extract_request_details};

const MAX_TITLE_LEN: usize = 200;
const MAX_DESCRIPTION_LEN: usize = 5000;

/// Creates tickets from chat messages.
///
/// Owns the field-shaping rules (title derivation, length clamps, padding of
/// degenerate inputs) so the router stages stay declarative.
pub struct TicketIntake {
    store: Arc<dyn TicketStore>,
}

impl TicketIntake {
    pub fn new(store: Arc<dyn TicketStore>) -> Self {
        Self { store }
    }

    /// Create and persist a ticket for `message` on behalf of `user_id`,
    /// classified as `category`.
    pub async fn create_from_message(
        &self,
        message: &str,
        user_id: &str,
        category: TicketCategory,
    ) -> Result<Ticket, RegideskError> {
        let priority = detect_priority(message);
        let request_details = extract_request_details(message, category);

        let mut title = derive_title(message);
        if title.chars().count() < 5 {
            title = format!("Request from chatbot: {title}");
        }
        let title: String = title.chars().take(MAX_TITLE_LEN).collect();

        let mut description: String = message.trim().chars().take(MAX_DESCRIPTION_LEN).collect();
        if description.chars().count() < 10 {
            description.push_str(" (Created via chatbot)");
        }

        let new = NewTicket {
            title,
            description,
            category,
            priority,
            created_by: user_id.to_string(),
            request_details,
        };
        let ticket = self.store.create_ticket(&new).await?;
        info!(
            ticket_number = %ticket.ticket_number,
            category = %ticket.category,
            priority = %ticket.priority,
            "ticket created"
        );
        Ok(ticket)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockTicketStore;
    use regidesk_core::TicketPriority;

    #[tokio::test]
    async fn short_title_gets_prefixed_and_short_description_padded() {
        let store = Arc::new(MockTicketStore::default());
        let intake = TicketIntake::new(store.clone());
        let ticket = intake
            .create_from_message("otr", "user-1", TicketCategory::OtrRequest)
            .await
            .unwrap();
        assert_eq!(ticket.title, "Request from chatbot: otr");
        assert_eq!(ticket.description, "otr (Created via chatbot)");
        assert_eq!(ticket.category, TicketCategory::OtrRequest);
        assert_eq!(ticket.created_by, "user-1");
    }

    #[tokio::test]
    async fn long_message_clamps_title_and_description() {
        let store = Arc::new(MockTicketStore::default());
        let intake = TicketIntake::new(store);
        let message = "a".repeat(6000);
        let ticket = intake
            .create_from_message(&message, "user-1", TicketCategory::GeneralInquiry)
            .await
            .unwrap();
        assert_eq!(ticket.title.chars().count(), 100);
        assert_eq!(ticket.description.chars().count(), 5000);
    }

    #[tokio::test]
    async fn urgency_and_details_flow_through() {
        let store = Arc::new(MockTicketStore::default());
        let intake = TicketIntake::new(store);
        let ticket = intake
            .create_from_message(
                "I urgently need 3 copies of my transcript, purpose: scholarship",
                "user-2",
                TicketCategory::OtrRequest,
            )
            .await
            .unwrap();
        assert_eq!(ticket.priority, TicketPriority::Urgent);
        assert_eq!(ticket.request_details.number_of_copies, Some(3));
        assert_eq!(
            ticket.request_details.purpose.as_deref(),
            Some("scholarship")
        );
    }

    #[tokio::test]
    async fn store_failure_propagates() {
        let store = Arc::new(MockTicketStore::failing());
        let intake = TicketIntake::new(store);
        let err = intake
            .create_from_message("I need my transcript", "user-1", TicketCategory::OtrRequest)
            .await
            .unwrap_err();
        assert!(matches!(err, RegideskError::Storage { .. }));
    }
}
