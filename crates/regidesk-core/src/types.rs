// SPDX-FileCopyrightText: 2026 Regidesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across the Regidesk workspace.
//!
//! Tickets, chat responses, and the conversation-context echo are defined
//! here so the router, storage, and gateway crates agree on one contract.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Ticket categories, in detection priority order.
///
/// The declared order matters: category detection scans this order and the
/// first category with a keyword hit wins, not the one with the most hits.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum TicketCategory {
    /// Official Transcript of Records request.
    #[strum(serialize = "OTR Request")]
    #[serde(rename = "OTR Request")]
    OtrRequest,
    /// Adding, dropping, or changing enrolled subjects.
    #[strum(serialize = "Subject Enrollment")]
    #[serde(rename = "Subject Enrollment")]
    SubjectEnrollment,
    /// Disputed or missing grades.
    #[strum(serialize = "Grade Concern")]
    #[serde(rename = "Grade Concern")]
    GradeConcern,
    /// Certificates, diplomas, and other registrar documents.
    #[strum(serialize = "Document Request")]
    #[serde(rename = "Document Request")]
    DocumentRequest,
    /// Anything that matched no category keyword.
    #[strum(serialize = "General Inquiry")]
    #[serde(rename = "General Inquiry")]
    GeneralInquiry,
}

impl Default for TicketCategory {
    fn default() -> Self {
        TicketCategory::GeneralInquiry
    }
}

/// Ticket urgency derived from the message text at creation time.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum TicketPriority {
    Low,
    Normal,
    High,
    Urgent,
}

impl Default for TicketPriority {
    fn default() -> Self {
        TicketPriority::Normal
    }
}

/// Lifecycle status of a ticket. Admins move tickets through these states;
/// the chat router only ever creates tickets in `Pending`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum TicketStatus {
    Pending,
    #[strum(serialize = "In Review")]
    #[serde(rename = "In Review")]
    InReview,
    Approved,
    Rejected,
    Completed,
    Cancelled,
    #[strum(serialize = "On Hold")]
    #[serde(rename = "On Hold")]
    OnHold,
}

/// Category-dependent structured fields extracted from the message.
///
/// Only OTR requests and subject enrollments carry structured details;
/// every other category gets an empty bag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_copies: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_name: Option<String>,
}

impl RequestDetails {
    /// True when no structured field was extracted.
    pub fn is_empty(&self) -> bool {
        self.number_of_copies.is_none()
            && self.purpose.is_none()
            && self.subject_code.is_none()
            && self.subject_name.is_none()
    }
}

/// A persisted service request. Never deleted by the chat core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticket {
    /// Internal row identifier (UUID v4).
    pub id: String,
    /// Public, system-generated unique number (`TICKET-YYYYMMDD-XXXX`).
    pub ticket_number: String,
    pub title: String,
    pub description: String,
    pub category: TicketCategory,
    pub priority: TicketPriority,
    pub status: TicketStatus,
    /// User who filed the ticket.
    pub created_by: String,
    /// Admin the ticket is assigned to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    #[serde(default)]
    pub request_details: RequestDetails,
    /// Resolution or rejection remarks entered by an admin.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
    /// ISO 8601 creation timestamp.
    pub created_at: String,
    /// ISO 8601 last-update timestamp.
    pub updated_at: String,
}

/// Fields needed to create a ticket. The store fills in identity, number,
/// status timestamps, and returns the full record.
#[derive(Debug, Clone)]
pub struct NewTicket {
    pub title: String,
    pub description: String,
    pub category: TicketCategory,
    pub priority: TicketPriority,
    pub created_by: String,
    pub request_details: RequestDetails,
}

/// Compact ticket view echoed in chat status replies and admin listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketSummary {
    pub ticket_number: String,
    pub title: String,
    pub status: TicketStatus,
    pub priority: TicketPriority,
    pub category: TicketCategory,
    pub created_at: String,
}

impl From<&Ticket> for TicketSummary {
    fn from(t: &Ticket) -> Self {
        Self {
            ticket_number: t.ticket_number.clone(),
            title: t.title.clone(),
            status: t.status,
            priority: t.priority,
            category: t.category,
            created_at: t.created_at.clone(),
        }
    }
}

/// Admin-side mutation of an existing ticket.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TicketUpdate {
    #[serde(default)]
    pub status: Option<TicketStatus>,
    #[serde(default)]
    pub resolution: Option<String>,
    #[serde(default)]
    pub assigned_to: Option<String>,
}

/// Query filter for ticket reads. All fields are conjunctive.
#[derive(Debug, Clone, Default)]
pub struct TicketFilter {
    pub created_by: Option<String>,
    pub ticket_number: Option<String>,
    pub status: Option<TicketStatus>,
    pub category: Option<TicketCategory>,
    pub priority: Option<TicketPriority>,
    /// Case-insensitive substring match over title, description, and number.
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Dimension for count aggregations on the admin reporting surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum StatDimension {
    Status,
    Category,
    Priority,
}

/// One bucket of an aggregation result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatBucket {
    pub key: String,
    pub count: u64,
}

/// Client-held state linking a ticket-creation offer to a later confirmation.
///
/// The server never persists this; the client must echo it back on the next
/// turn. It is trusted as received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationContext {
    pub original_message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<TicketCategory>,
}

/// One inbound chat turn: what the user said, who they are, and the optional
/// echoed context from the previous offer.
#[derive(Debug, Clone)]
pub struct Utterance {
    pub message: String,
    pub user_id: String,
    pub context: Option<ConversationContext>,
}

/// Action tag attached to a chat response so the client can react
/// (render a ticket card, show an offer prompt, and so on).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatAction {
    TicketCreated,
    TicketStatus,
    TicketOffer,
    DepartmentInfo,
}

/// The sole output contract of the intent router. Constructed fresh per call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<ChatAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket: Option<Ticket>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tickets: Option<Vec<TicketSummary>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_context: Option<ConversationContext>,
}

impl ChatResponse {
    /// A plain text reply with no action tag.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            action: None,
            ticket: None,
            tickets: None,
            conversation_context: None,
        }
    }
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the type of adapter behind a trait object.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Storage,
    Provider,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn category_display_round_trips() {
        for cat in [
            TicketCategory::OtrRequest,
            TicketCategory::SubjectEnrollment,
            TicketCategory::GradeConcern,
            TicketCategory::DocumentRequest,
            TicketCategory::GeneralInquiry,
        ] {
            let s = cat.to_string();
            assert_eq!(TicketCategory::from_str(&s).unwrap(), cat);
        }
        assert_eq!(TicketCategory::OtrRequest.to_string(), "OTR Request");
        assert_eq!(TicketCategory::default(), TicketCategory::GeneralInquiry);
    }

    #[test]
    fn status_display_round_trips() {
        for status in [
            TicketStatus::Pending,
            TicketStatus::InReview,
            TicketStatus::Approved,
            TicketStatus::Rejected,
            TicketStatus::Completed,
            TicketStatus::Cancelled,
            TicketStatus::OnHold,
        ] {
            let s = status.to_string();
            assert_eq!(TicketStatus::from_str(&s).unwrap(), status);
        }
        assert_eq!(TicketStatus::InReview.to_string(), "In Review");
        assert_eq!(TicketStatus::OnHold.to_string(), "On Hold");
    }

    #[test]
    fn chat_action_serializes_snake_case() {
        let json = serde_json::to_string(&ChatAction::TicketOffer).unwrap();
        assert_eq!(json, "\"ticket_offer\"");
        let json = serde_json::to_string(&ChatAction::DepartmentInfo).unwrap();
        assert_eq!(json, "\"department_info\"");
    }

    #[test]
    fn chat_response_omits_empty_fields() {
        let resp = ChatResponse::text("hello");
        let json = serde_json::to_string(&resp).unwrap();
        assert_eq!(json, "{\"text\":\"hello\"}");
    }

    #[test]
    fn request_details_empty_bag() {
        let details = RequestDetails::default();
        assert!(details.is_empty());
        let json = serde_json::to_string(&details).unwrap();
        assert_eq!(json, "{}");

        let details = RequestDetails {
            number_of_copies: Some(2),
            purpose: Some("job application".into()),
            ..Default::default()
        };
        assert!(!details.is_empty());
    }

    #[test]
    fn conversation_context_round_trips() {
        let ctx = ConversationContext {
            original_message: "I need an OTR".into(),
            category: Some(TicketCategory::OtrRequest),
        };
        let json = serde_json::to_string(&ctx).unwrap();
        let parsed: ConversationContext = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, ctx);
        assert!(json.contains("OTR Request"));
    }

    #[test]
    fn ticket_summary_from_ticket() {
        let ticket = Ticket {
            id: "id-1".into(),
            ticket_number: "TICKET-20260101-AB12".into(),
            title: "Request OTR".into(),
            description: "I need my transcript".into(),
            category: TicketCategory::OtrRequest,
            priority: TicketPriority::Normal,
            status: TicketStatus::Pending,
            created_by: "user-1".into(),
            assigned_to: None,
            request_details: RequestDetails::default(),
            resolution: None,
            created_at: "2026-01-01T00:00:00.000Z".into(),
            updated_at: "2026-01-01T00:00:00.000Z".into(),
        };
        let summary = TicketSummary::from(&ticket);
        assert_eq!(summary.ticket_number, "TICKET-20260101-AB12");
        assert_eq!(summary.status, TicketStatus::Pending);
    }
}
