// SPDX-FileCopyrightText: 2026 Regidesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Field extraction from free-form user messages.

use std::sync::LazyLock;

use regex::Regex;

use regidesk_core::{RequestDetails, TicketCategory, TicketPriority};

static COPIES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+)\s*cop(?:y|ies)").expect("valid regex"));

static PURPOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)purpose[:\s]+([^,.\n]+)").expect("valid regex"));

static SUBJECT_CODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:subject\s+code|code)[:\s]+([^,.\n]+)").expect("valid regex")
});

static SUBJECT_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:subject|course)[:\s]+([^,.\n]+)").expect("valid regex")
});

/// Extract structured request details relevant to the category.
///
/// OTR requests pick up copy counts and a stated purpose; enrollment picks
/// up subject code and name. Anything not present in the message stays
/// `None`; other categories always get an empty bag.
pub fn extract_request_details(message: &str, category: TicketCategory) -> RequestDetails {
    let mut details = RequestDetails::default();
    match category {
        TicketCategory::OtrRequest => {
            details.number_of_copies = COPIES
                .captures(message)
                .and_then(|c| c.get(1))
                .and_then(|m| m.as_str().parse::<u32>().ok());
            details.purpose = PURPOSE
                .captures(message)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str().trim().to_string())
                .filter(|s| !s.is_empty());
        }
        TicketCategory::SubjectEnrollment => {
            details.subject_code = SUBJECT_CODE
                .captures(message)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str().trim().to_string())
                .filter(|s| !s.is_empty());
            // "subject code: ..." also matches the name pattern; drop those
            // captures so the code does not leak into the name field.
            details.subject_name = SUBJECT_NAME
                .captures(message)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str().trim().to_string())
                .filter(|s| !s.is_empty() && !s.to_lowercase().starts_with("code"));
        }
        TicketCategory::GradeConcern
        | TicketCategory::DocumentRequest
        | TicketCategory::GeneralInquiry => {}
    }
    details
}

/// Derive ticket priority from urgency words in the message.
pub fn detect_priority(message: &str) -> TicketPriority {
    let lower = message.to_lowercase();
    if ["urgent", "asap", "immediately"]
        .iter()
        .any(|w| lower.contains(w))
    {
        TicketPriority::Urgent
    } else if ["important", "soon"].iter().any(|w| lower.contains(w)) {
        TicketPriority::High
    } else {
        TicketPriority::Normal
    }
}

/// Derive a ticket title from the message: the first 100 characters,
/// cut on a char boundary.
pub fn derive_title(message: &str) -> String {
    let trimmed = message.trim();
    trimmed.chars().take(100).collect()
}
