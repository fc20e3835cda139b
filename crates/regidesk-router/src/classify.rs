// SPDX-FileCopyrightText: 2026 Regidesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Heuristic intent classification for the message router.
//!
//! Zero-cost keyword scans over the user message. No model pre-call, no
//! network, no latency. All predicates expect the caller to pass the raw
//! message; folding and trimming happen here.

use std::sync::LazyLock;

use regex::Regex;

use regidesk_core::TicketCategory;

/// Greeting prefixes (trimmed, case-insensitive prefix match).
const GREETING_PREFIXES: &[&str] = &[
    "hi", "hello", "hey", "good morning", "good afternoon", "good evening", "greetings",
];

/// Affirmations that confirm a pending ticket offer (exact match after
/// trim + case fold).
const AFFIRMATIONS_EXACT: &[&str] = &["yes", "y", "ok", "okay", "sure", "create", "create ticket"];

/// Affirmation phrases matched as substrings.
const AFFIRMATIONS_CONTAINS: &[&str] = &["yes, create", "yes create"];

/// Cues that gate the department/service lookup stage.
const LOCATION_CUES: &[&str] = &[
    "where", "location", "find", "get", "obtain", "available", "can i get", "how to get",
];

/// Cues that turn a department or FAQ reply into a ticket offer.
const REQUEST_CUES: &[&str] = &[
    "request", "need", "want", "apply", "create", "submit", "help with", "inquiry",
];

/// Cues for the implicit-ticket-need stage (no earlier stage matched).
const TICKET_NEED_CUES: &[&str] = &[
    "request", "need", "want", "apply", "create", "submit", "help with", "assistance",
    "issue", "problem",
];

/// Fixed phrases that trigger a ticket status inquiry.
const STATUS_PHRASES: &[&str] = &[
    "ticket status",
    "check ticket",
    "my tickets",
    "status of",
    "ticket number",
    "view ticket",
    "show ticket",
    "what is my ticket",
    "where is my ticket",
    "ticket update",
    "ticket progress",
    "ticket information",
    "my ticket info",
];

/// Ordered category -> keyword mapping. The first category (in this order)
/// with any substring hit wins; count of hits is irrelevant.
const CATEGORY_KEYWORDS: &[(TicketCategory, &[&str])] = &[
    (
        TicketCategory::OtrRequest,
        &["otr", "transcript of records", "transcript"],
    ),
    (
        TicketCategory::SubjectEnrollment,
        &["enroll", "enrollment", "add subject", "drop subject", "subject", "course"],
    ),
    (
        TicketCategory::GradeConcern,
        &["grade", "gwa", "rating", "incomplete mark"],
    ),
    (
        TicketCategory::DocumentRequest,
        &[
            "coe",
            "certificate",
            "certification",
            "diploma",
            "form 137",
            "cav",
            "good moral",
            "honorable dismissal",
        ],
    ),
];

/// Strict ticket number pattern, e.g. `TICKET-20240101-ABC`.
static STRICT_TICKET_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)ticket-[a-z0-9][a-z0-9-]*").expect("valid regex"));

/// Loose ticket reference, e.g. `ticket 12345` or `#12345`.
static LOOSE_TICKET_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:ticket|#)\s*([a-z0-9-]+)").expect("valid regex"));

/// True when the message opens with a greeting.
pub fn is_greeting(message: &str) -> bool {
    let lower = message.trim().to_lowercase();
    GREETING_PREFIXES.iter().any(|g| lower.starts_with(g))
}

/// True when the message confirms a pending ticket offer.
pub fn is_affirmation(message: &str) -> bool {
    let lower = message.trim().to_lowercase();
    AFFIRMATIONS_EXACT.iter().any(|a| lower == *a)
        || AFFIRMATIONS_CONTAINS.iter().any(|a| lower.contains(a))
}

/// True when the message asks where/how to get something.
pub fn has_location_cue(message: &str) -> bool {
    let lower = message.to_lowercase();
    LOCATION_CUES.iter().any(|c| lower.contains(c))
}

/// True when the message carries request intent (used to append ticket
/// offers to department and FAQ replies).
pub fn has_request_cue(message: &str) -> bool {
    let lower = message.to_lowercase();
    REQUEST_CUES.iter().any(|c| lower.contains(c))
}

/// True when the message implies the user needs a ticket.
pub fn has_ticket_need_cue(message: &str) -> bool {
    let lower = message.to_lowercase();
    TICKET_NEED_CUES.iter().any(|c| lower.contains(c))
}

/// True when the message is a ticket status inquiry.
pub fn is_status_inquiry(message: &str) -> bool {
    let lower = message.to_lowercase();
    STATUS_PHRASES.iter().any(|p| lower.contains(p))
}

/// Detect the ticket category for a message.
///
/// Scans [`CATEGORY_KEYWORDS`] in declared order; the first category with at
/// least one keyword substring hit wins. Defaults to `General Inquiry`.
pub fn detect_category(message: &str) -> TicketCategory {
    let lower = message.to_lowercase();
    for (category, keywords) in CATEGORY_KEYWORDS {
        if keywords.iter().any(|k| lower.contains(k)) {
            return *category;
        }
    }
    TicketCategory::GeneralInquiry
}

/// Extract a ticket number reference from a status inquiry.
///
/// Prefers the strict `TICKET-...` form (upper-cased on extraction). Falls
/// back to a loose `ticket <token>` / `#<token>` form; the loose token must
/// contain a digit so that phrases like "ticket status" do not extract
/// "status" as a number.
pub fn extract_ticket_number(message: &str) -> Option<String> {
    if let Some(m) = STRICT_TICKET_NUMBER.find(message) {
        return Some(m.as_str().to_uppercase());
    }
    if let Some(caps) = LOOSE_TICKET_NUMBER.captures(message) {
        let token = caps.get(1).map(|m| m.as_str())?;
        if token.chars().any(|c| c.is_ascii_digit()) {
            return Some(token.to_string());
        }
    }
    None
}
