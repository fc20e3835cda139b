// SPDX-FileCopyrightText: 2026 Regidesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The message intent router.
//!
//! A fixed priority chain of stages; the first stage that matches produces
//! the reply and the rest never run. Stateless per call: everything the
//! router needs arrives in the [`Utterance`] or was injected at build time.

use std::fmt::Write as _;
use std::sync::Arc;

use chrono::{Local, Timelike};
use tracing::{debug, warn};

use regidesk_catalog::{Catalogs, DepartmentEntry, FaqEntry};
use regidesk_core::{
    ChatAction, ChatResponse, CompletionProvider, CompletionRequest, ConversationContext,
    RegideskError, Ticket, TicketCategory, TicketFilter, TicketStore, TicketSummary, Utterance,
};

use crate::classify;
use crate::intake::TicketIntake;

/// Most recent tickets shown in a status listing.
const STATUS_LIST_CAP: usize = 10;

const OFFER_PROMPT: &str =
    "Would you like me to create a ticket for this? Just reply \"yes\" to proceed.";

const FALLBACK_APOLOGY: &str = "I'm sorry, I don't have an answer for that right now. \
     You can ask me about requesting documents (OTR, COE, certificates), subject \
     enrollment, grade concerns, or the status of your tickets. For anything else, \
     please contact the Office of the University Registrar directly.";

/// Routes each inbound chat turn to the first matching intent stage.
pub struct IntentRouter {
    agent_name: String,
    catalogs: Arc<Catalogs>,
    store: Arc<dyn TicketStore>,
    provider: Option<Arc<dyn CompletionProvider>>,
    intake: TicketIntake,
}

impl IntentRouter {
    pub fn new(
        agent_name: impl Into<String>,
        catalogs: Arc<Catalogs>,
        store: Arc<dyn TicketStore>,
        provider: Option<Arc<dyn CompletionProvider>>,
    ) -> Self {
        let intake = TicketIntake::new(store.clone());
        Self {
            agent_name: agent_name.into(),
            catalogs,
            store,
            provider,
            intake,
        }
    }

    /// Route one utterance to a reply.
    ///
    /// Only a storage failure on the status-inquiry read path is returned as
    /// an error; every other failure (ticket creation, completion provider)
    /// is recovered into reply text.
    pub async fn route(&self, utterance: &Utterance) -> Result<ChatResponse, RegideskError> {
        let message = utterance.message.as_str();

        if let Some(response) = self.try_greeting(message) {
            debug!(stage = "greeting", "matched");
            return Ok(response);
        }
        if let Some(response) = self.try_confirmation(utterance).await {
            debug!(stage = "confirmation", "matched");
            return Ok(response);
        }
        if let Some(response) = self.try_department_lookup(message) {
            debug!(stage = "department", "matched");
            return Ok(response);
        }
        if let Some(response) = self.try_faq(message) {
            debug!(stage = "faq", "matched");
            return Ok(response);
        }
        if let Some(response) = self.try_status_inquiry(utterance).await? {
            debug!(stage = "status", "matched");
            return Ok(response);
        }
        if let Some(response) = self.try_ticket_offer(message) {
            debug!(stage = "ticket_need", "matched");
            return Ok(response);
        }
        debug!(stage = "fallback", "no stage matched");
        Ok(self.fallback(message).await)
    }

    // Stage 1: greeting. Terminal even when the rest of the message carries
    // request keywords.
    fn try_greeting(&self, message: &str) -> Option<ChatResponse> {
        if !classify::is_greeting(message) {
            return None;
        }
        let hour = Local::now().hour();
        Some(ChatResponse::text(self.greeting_text(hour)))
    }

    fn greeting_text(&self, hour: u32) -> String {
        let salutation = match hour {
            0..=11 => "Good morning",
            12..=17 => "Good afternoon",
            _ => "Good evening",
        };
        format!(
            "{salutation}! I'm {name}, the registrar helpdesk assistant. I can help \
             you request documents (OTR, COE, certificates), enroll in subjects, \
             raise grade concerns, and check the status of your tickets. What can I \
             do for you today?",
            name = self.agent_name
        )
    }

    // Stage 2: confirmation of a pending ticket offer. Creation failures are
    // reported in the reply text, never propagated. There is no idempotency
    // guard, so confirming twice in quick succession creates two tickets.
    async fn try_confirmation(&self, utterance: &Utterance) -> Option<ChatResponse> {
        if !classify::is_affirmation(&utterance.message) {
            return None;
        }
        let (source_message, category) = match &utterance.context {
            Some(ctx) => (
                ctx.original_message.clone(),
                ctx.category
                    .unwrap_or_else(|| classify::detect_category(&ctx.original_message)),
            ),
            None => (
                utterance.message.clone(),
                classify::detect_category(&utterance.message),
            ),
        };
        match self
            .intake
            .create_from_message(&source_message, &utterance.user_id, category)
            .await
        {
            Ok(ticket) => Some(ticket_created_response(ticket)),
            Err(error) => {
                warn!(%error, "ticket creation failed");
                Some(ChatResponse::text(
                    "Sorry, I wasn't able to create your ticket just now. Please try \
                     again in a moment, or visit the registrar's office directly.",
                ))
            }
        }
    }

    // Stage 3: department lookup. First department (catalog order) offering
    // a service named in the message wins.
    fn try_department_lookup(&self, message: &str) -> Option<ChatResponse> {
        if !classify::has_location_cue(message) {
            return None;
        }
        let lower = message.to_lowercase();
        let department = self
            .catalogs
            .departments
            .iter()
            .find(|d| d.services.iter().any(|s| lower.contains(&s.to_lowercase())))?;

        let mut text = format_department(department);
        if classify::has_request_cue(message) {
            let category = classify::detect_category(message);
            let _ = write!(text, "\n\n{OFFER_PROMPT}");
            return Some(ChatResponse {
                text,
                action: Some(ChatAction::TicketOffer),
                ticket: None,
                tickets: None,
                conversation_context: Some(ConversationContext {
                    original_message: message.to_string(),
                    category: Some(category),
                }),
            });
        }
        Some(ChatResponse {
            action: Some(ChatAction::DepartmentInfo),
            ..ChatResponse::text(text)
        })
    }

    // Stage 4: FAQ. Keyword substring, or any question word longer than
    // three characters appearing in the message. Deliberately loose.
    fn try_faq(&self, message: &str) -> Option<ChatResponse> {
        let lower = message.to_lowercase();
        let faq = self.catalogs.faqs.iter().find(|f| faq_matches(f, &lower))?;

        let mut text = faq.answer.clone();
        if classify::has_request_cue(message) {
            let category = classify::detect_category(message);
            let _ = write!(text, "\n\n{OFFER_PROMPT}");
            return Some(ChatResponse {
                text,
                action: Some(ChatAction::TicketOffer),
                ticket: None,
                tickets: None,
                conversation_context: Some(ConversationContext {
                    original_message: message.to_string(),
                    category: Some(category),
                }),
            });
        }
        Some(ChatResponse::text(text))
    }

    // Stage 5: ticket status. The only stage whose storage errors propagate.
    async fn try_status_inquiry(
        &self,
        utterance: &Utterance,
    ) -> Result<Option<ChatResponse>, RegideskError> {
        if !classify::is_status_inquiry(&utterance.message) {
            return Ok(None);
        }
        let number = classify::extract_ticket_number(&utterance.message);
        let filter = TicketFilter {
            created_by: Some(utterance.user_id.clone()),
            ticket_number: number.clone(),
            limit: Some(STATUS_LIST_CAP as i64),
            ..Default::default()
        };
        let tickets = self.store.find_tickets(&filter).await?;

        if tickets.is_empty() {
            let text = match &number {
                Some(n) => format!(
                    "I couldn't find a ticket with number {n} under your account. \
                     Please double-check the number, or ask me to show your tickets."
                ),
                None => "You don't have any tickets yet. If you need help with a \
                         request, just tell me what you need and I can create one \
                         for you."
                    .to_string(),
            };
            return Ok(Some(ChatResponse::text(text)));
        }

        if tickets.len() == 1 && number.is_some() {
            let ticket = tickets.into_iter().next().unwrap();
            let text = format_ticket_detail(&ticket);
            return Ok(Some(ChatResponse {
                text,
                action: Some(ChatAction::TicketStatus),
                ticket: Some(ticket),
                tickets: None,
                conversation_context: None,
            }));
        }

        let summaries: Vec<TicketSummary> = tickets.iter().map(TicketSummary::from).collect();
        let mut text = String::from("Here are your tickets:\n");
        for (i, summary) in summaries.iter().enumerate() {
            let _ = write!(
                text,
                "\n{}. {} - {} [{}]",
                i + 1,
                summary.ticket_number,
                summary.title,
                summary.status
            );
        }
        if summaries.len() == STATUS_LIST_CAP {
            let _ = write!(text, "\n\nShowing your {STATUS_LIST_CAP} most recent tickets.");
        }
        let _ = write!(
            text,
            "\n\nAsk me about a specific ticket number for full details."
        );
        Ok(Some(ChatResponse {
            text,
            action: Some(ChatAction::TicketStatus),
            ticket: None,
            tickets: Some(summaries),
            conversation_context: None,
        }))
    }

    // Stage 6: implicit ticket need. Offers creation rather than creating
    // outright; the next affirmative turn closes the loop.
    fn try_ticket_offer(&self, message: &str) -> Option<ChatResponse> {
        if !classify::has_ticket_need_cue(message) {
            return None;
        }
        let category = classify::detect_category(message);
        Some(ChatResponse {
            text: format!(
                "It sounds like you need help with a {category}. {OFFER_PROMPT}"
            ),
            action: Some(ChatAction::TicketOffer),
            ticket: None,
            tickets: None,
            conversation_context: Some(ConversationContext {
                original_message: message.to_string(),
                category: Some(category),
            }),
        })
    }

    // Stage 7: completion fallback. One call, no retry; any failure (or no
    // configured provider) degrades to a canned redirect.
    async fn fallback(&self, message: &str) -> ChatResponse {
        let Some(provider) = &self.provider else {
            return ChatResponse::text(FALLBACK_APOLOGY);
        };
        let request = CompletionRequest {
            system: self.fallback_system_prompt(),
            user_message: message.to_string(),
        };
        match provider.complete(request).await {
            Ok(reply) => ChatResponse::text(reply.trim().to_string()),
            Err(error) => {
                warn!(%error, "completion provider failed");
                ChatResponse::text(FALLBACK_APOLOGY)
            }
        }
    }

    fn fallback_system_prompt(&self) -> String {
        let mut prompt = format!(
            "You are {}, a concise and friendly assistant for a university \
             registrar helpdesk. Answer questions about registrar services in a \
             few sentences. If you don't know, say so and point the student to \
             the right office.",
            self.agent_name
        );
        if !self.catalogs.departments.is_empty() {
            prompt.push_str("\n\nKnown offices:");
            for dept in &self.catalogs.departments {
                let _ = write!(
                    prompt,
                    "\n- {} ({}, {}): {}",
                    dept.name,
                    dept.location,
                    dept.hours,
                    dept.services.join(", ")
                );
            }
        }
        prompt
    }
}

fn ticket_created_response(ticket: Ticket) -> ChatResponse {
    let text = format!(
        "Your ticket has been created!\n\nTicket number: {}\nTitle: {}\nCategory: {}\n\
         Priority: {}\n\nOur staff will review it shortly. You can check on it \
         anytime by asking for your ticket status.",
        ticket.ticket_number, ticket.title, ticket.category, ticket.priority
    );
    ChatResponse {
        text,
        action: Some(ChatAction::TicketCreated),
        ticket: Some(ticket),
        tickets: None,
        conversation_context: None,
    }
}

fn format_department(dept: &DepartmentEntry) -> String {
    let mut text = format!(
        "You can get that at the {}.\nLocation: {}\nHours: {}",
        dept.name, dept.location, dept.hours
    );
    if let Some(contact) = &dept.contact {
        let _ = write!(text, "\nEmail: {contact}");
    }
    if let Some(phone) = &dept.phone {
        let _ = write!(text, "\nPhone: {phone}");
    }
    text
}

fn format_ticket_detail(ticket: &Ticket) -> String {
    let mut text = format!(
        "Here's your ticket {}:\nTitle: {}\nCategory: {}\nStatus: {}\nPriority: {}\n\
         Created: {}",
        ticket.ticket_number,
        ticket.title,
        ticket.category,
        ticket.status,
        ticket.priority,
        ticket.created_at
    );
    if let Some(assignee) = &ticket.assigned_to {
        let _ = write!(text, "\nAssigned to: {assignee}");
    }
    if let Some(resolution) = &ticket.resolution {
        let _ = write!(text, "\nResolution: {resolution}");
    }
    text
}

fn faq_matches(faq: &FaqEntry, lower_message: &str) -> bool {
    if faq
        .keywords
        .iter()
        .any(|k| lower_message.contains(&k.to_lowercase()))
    {
        return true;
    }
    faq.question
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.len() > 3)
        .any(|w| lower_message.contains(w))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockCompletionProvider, MockTicketStore};
    use regidesk_core::{RequestDetails, TicketPriority, TicketStatus};

    fn catalogs() -> Arc<Catalogs> {
        Arc::new(Catalogs::builtin())
    }

    fn router_with(store: Arc<MockTicketStore>) -> IntentRouter {
        IntentRouter::new("RegiBot", catalogs(), store, None)
    }

    fn utterance(message: &str) -> Utterance {
        Utterance {
            message: message.to_string(),
            user_id: "student-1".to_string(),
            context: None,
        }
    }

    #[tokio::test]
    async fn greeting_wins_over_request_keywords() {
        let router = router_with(Arc::new(MockTicketStore::default()));
        let resp = router
            .route(&utterance("Hello! I urgently need my transcript"))
            .await
            .unwrap();
        assert!(resp.text.contains("registrar helpdesk assistant"));
        assert!(resp.action.is_none());
        assert!(resp.ticket.is_none());
    }

    #[tokio::test]
    async fn greeting_is_byte_identical_across_calls() {
        let router = router_with(Arc::new(MockTicketStore::default()));
        let first = router.route(&utterance("hi")).await.unwrap();
        let second = router.route(&utterance("hi")).await.unwrap();
        assert_eq!(first.text, second.text);
    }

    #[tokio::test]
    async fn confirmation_with_context_rederives_fields() {
        let store = Arc::new(MockTicketStore::default());
        let router = router_with(store.clone());
        let turn = Utterance {
            message: "yes".to_string(),
            user_id: "student-1".to_string(),
            context: Some(ConversationContext {
                original_message:
                    "I need 2 copies of my transcript, purpose: job application".to_string(),
                category: Some(TicketCategory::OtrRequest),
            }),
        };
        let resp = router.route(&turn).await.unwrap();
        assert_eq!(resp.action, Some(ChatAction::TicketCreated));
        let ticket = resp.ticket.expect("ticket in response");
        assert_eq!(ticket.category, TicketCategory::OtrRequest);
        assert_eq!(ticket.request_details.number_of_copies, Some(2));
        assert_eq!(
            ticket.request_details.purpose.as_deref(),
            Some("job application")
        );
        assert_eq!(ticket.status, TicketStatus::Pending);
    }

    #[tokio::test]
    async fn confirmation_survives_store_failure() {
        let router = router_with(Arc::new(MockTicketStore::failing()));
        let turn = Utterance {
            message: "yes".to_string(),
            user_id: "student-1".to_string(),
            context: Some(ConversationContext {
                original_message: "I need my transcript".to_string(),
                category: None,
            }),
        };
        let resp = router.route(&turn).await.unwrap();
        assert!(resp.text.contains("wasn't able to create"));
        assert!(resp.action.is_none());
    }

    #[tokio::test]
    async fn department_lookup_without_request_cue_is_info_only() {
        let router = router_with(Arc::new(MockTicketStore::default()));
        let resp = router
            .route(&utterance("Where can I pick up a diploma?"))
            .await
            .unwrap();
        assert_eq!(resp.action, Some(ChatAction::DepartmentInfo));
        assert!(resp.text.contains("Office of the University Registrar"));
        assert!(resp.conversation_context.is_none());
    }

    #[tokio::test]
    async fn department_lookup_with_request_cue_offers_a_ticket() {
        let router = router_with(Arc::new(MockTicketStore::default()));
        let resp = router
            .route(&utterance("Where can I request a transcript?"))
            .await
            .unwrap();
        assert_eq!(resp.action, Some(ChatAction::TicketOffer));
        let ctx = resp.conversation_context.expect("context attached");
        assert_eq!(ctx.category, Some(TicketCategory::OtrRequest));
        assert_eq!(ctx.original_message, "Where can I request a transcript?");
    }

    #[tokio::test]
    async fn status_inquiry_unknown_number_echoes_it() {
        let router = router_with(Arc::new(MockTicketStore::default()));
        let resp = router
            .route(&utterance("check ticket TICKET-20260101-ZZZZ"))
            .await
            .unwrap();
        assert!(resp.text.contains("couldn't find"));
        assert!(resp.text.contains("TICKET-20260101-ZZZZ"));
        assert!(resp.action.is_none());
    }

    #[tokio::test]
    async fn status_inquiry_caps_list_and_notes_truncation() {
        let store = Arc::new(MockTicketStore::default());
        let router = router_with(store.clone());
        for i in 0..12 {
            let turn = Utterance {
                message: format!("yes, create (request {i})"),
                user_id: "student-1".to_string(),
                context: Some(ConversationContext {
                    original_message: format!("I need my transcript, request {i}"),
                    category: None,
                }),
            };
            router.route(&turn).await.unwrap();
        }
        let resp = router.route(&utterance("my tickets")).await.unwrap();
        assert_eq!(resp.action, Some(ChatAction::TicketStatus));
        let summaries = resp.tickets.expect("summaries");
        assert_eq!(summaries.len(), 10);
        assert!(resp.text.contains("10 most recent"));
    }

    #[tokio::test]
    async fn status_inquiry_detail_view_names_the_assignee() {
        let store = Arc::new(MockTicketStore::default());
        store.seed(Ticket {
            id: "id-1".to_string(),
            ticket_number: "TICKET-20260830-AB12".to_string(),
            title: "Transcript request".to_string(),
            description: "I need my transcript".to_string(),
            category: TicketCategory::OtrRequest,
            priority: TicketPriority::Normal,
            status: TicketStatus::InReview,
            created_by: "student-1".to_string(),
            assigned_to: Some("admin-7".to_string()),
            request_details: RequestDetails::default(),
            resolution: None,
            created_at: "2026-08-30T00:00:00.000Z".to_string(),
            updated_at: "2026-08-30T00:00:00.000Z".to_string(),
        });
        let router = router_with(store);
        let resp = router
            .route(&utterance("check ticket TICKET-20260830-AB12"))
            .await
            .unwrap();
        assert_eq!(resp.action, Some(ChatAction::TicketStatus));
        assert!(resp.text.contains("Assigned to: admin-7"));
    }

    #[tokio::test]
    async fn status_inquiry_only_sees_own_tickets() {
        let store = Arc::new(MockTicketStore::default());
        let router = router_with(store.clone());
        let other = Utterance {
            message: "create ticket".to_string(),
            user_id: "someone-else".to_string(),
            context: Some(ConversationContext {
                original_message: "I need a COE".to_string(),
                category: None,
            }),
        };
        let created = router.route(&other).await.unwrap().ticket.unwrap();
        let resp = router
            .route(&utterance(&format!("check ticket {}", created.ticket_number)))
            .await
            .unwrap();
        assert!(resp.text.contains("couldn't find"));
    }

    #[tokio::test]
    async fn status_inquiry_storage_error_propagates() {
        let router = router_with(Arc::new(MockTicketStore::failing()));
        let err = router.route(&utterance("my tickets")).await.unwrap_err();
        assert!(matches!(err, RegideskError::Storage { .. }));
    }

    #[tokio::test]
    async fn urgent_without_category_becomes_urgent_general_inquiry() {
        let store = Arc::new(MockTicketStore::default());
        let router = router_with(store.clone());
        let offer = router
            .route(&utterance("I urgently need assistance with something"))
            .await
            .unwrap();
        assert_eq!(offer.action, Some(ChatAction::TicketOffer));
        let ctx = offer.conversation_context.unwrap();
        assert_eq!(ctx.category, Some(TicketCategory::GeneralInquiry));

        let confirm = Utterance {
            message: "yes".to_string(),
            user_id: "student-1".to_string(),
            context: Some(ctx),
        };
        let resp = router.route(&confirm).await.unwrap();
        let ticket = resp.ticket.unwrap();
        assert_eq!(ticket.category, TicketCategory::GeneralInquiry);
        assert_eq!(ticket.priority, TicketPriority::Urgent);
    }

    #[tokio::test]
    async fn faq_answers_office_hours() {
        let router = router_with(Arc::new(MockTicketStore::default()));
        let resp = router
            .route(&utterance("what are your office hours?"))
            .await
            .unwrap();
        assert!(resp.action.is_none());
        assert!(resp.text.to_lowercase().contains("monday"));
    }

    #[tokio::test]
    async fn fallback_without_provider_is_static_apology() {
        let router = router_with(Arc::new(MockTicketStore::default()));
        let resp = router
            .route(&utterance("tell me about the weather"))
            .await
            .unwrap();
        assert_eq!(resp.text, FALLBACK_APOLOGY);
        assert!(resp.action.is_none());
    }

    #[tokio::test]
    async fn fallback_uses_provider_and_trims_reply() {
        let provider = Arc::new(MockCompletionProvider::replying("  An answer.  "));
        let router = IntentRouter::new(
            "RegiBot",
            catalogs(),
            Arc::new(MockTicketStore::default()),
            Some(provider.clone()),
        );
        let resp = router
            .route(&utterance("tell me about the weather"))
            .await
            .unwrap();
        assert_eq!(resp.text, "An answer.");
        let request = provider.last_request().expect("provider called");
        assert!(request.system.contains("Office of the University Registrar"));
        assert_eq!(request.user_message, "tell me about the weather");
    }

    #[tokio::test]
    async fn fallback_provider_failure_degrades_to_apology() {
        let provider = Arc::new(MockCompletionProvider::failing());
        let router = IntentRouter::new(
            "RegiBot",
            catalogs(),
            Arc::new(MockTicketStore::default()),
            Some(provider),
        );
        let resp = router
            .route(&utterance("tell me about the weather"))
            .await
            .unwrap();
        assert_eq!(resp.text, FALLBACK_APOLOGY);
    }

    #[test]
    fn greeting_text_tracks_time_of_day() {
        let router = router_with(Arc::new(MockTicketStore::default()));
        assert!(router.greeting_text(9).starts_with("Good morning"));
        assert!(router.greeting_text(12).starts_with("Good afternoon"));
        assert!(router.greeting_text(17).starts_with("Good afternoon"));
        assert!(router.greeting_text(18).starts_with("Good evening"));
        assert!(router.greeting_text(23).starts_with("Good evening"));
    }
}
