// SPDX-FileCopyrightText: 2026 Regidesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Regidesk registrar helpdesk.
//!
//! This crate provides the foundational trait definitions, error type, and
//! domain types used throughout the Regidesk workspace. The router, storage,
//! provider, and gateway crates all build on the contracts defined here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::RegideskError;
pub use types::{
    AdapterType, ChatAction, ChatResponse, ConversationContext, HealthStatus, NewTicket,
    RequestDetails, StatBucket, StatDimension, Ticket, TicketCategory, TicketFilter,
    TicketPriority, TicketStatus, TicketSummary, TicketUpdate, Utterance,
};

pub use traits::{CompletionProvider, CompletionRequest, PluginAdapter, TicketStore};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regidesk_error_has_all_variants() {
        let _config = RegideskError::Config("test".into());
        let _catalog = RegideskError::Catalog("test".into());
        let _storage = RegideskError::Storage {
            source: Box::new(std::io::Error::other("test")),
        };
        let _provider = RegideskError::Provider {
            message: "test".into(),
            source: None,
        };
        let _gateway = RegideskError::Gateway {
            message: "test".into(),
            source: None,
        };
        let _internal = RegideskError::Internal("test".into());
    }

    #[test]
    fn adapter_type_round_trips() {
        use std::str::FromStr;
        for variant in [AdapterType::Storage, AdapterType::Provider] {
            let s = variant.to_string();
            assert_eq!(AdapterType::from_str(&s).unwrap(), variant);
        }
    }

    #[test]
    fn trait_objects_are_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn TicketStore>();
        assert_send_sync::<dyn CompletionProvider>();
    }
}
