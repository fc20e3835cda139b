// SPDX-FileCopyrightText: 2026 Regidesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Completion provider trait for the external text-generation fallback.

use async_trait::async_trait;

use crate::error::RegideskError;
use crate::traits::adapter::PluginAdapter;

/// A single fallback completion request.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// System prompt (built from the department catalog by the router).
    pub system: String,
    /// The raw user utterance.
    pub user_message: String,
}

/// Adapter for the external completion service used as last-resort responder.
///
/// One synchronous round trip per call; callers handle failure by degrading
/// to a canned reply, so implementations should not retry.
#[async_trait]
pub trait CompletionProvider: PluginAdapter {
    /// Sends a completion request and returns the response text.
    async fn complete(&self, request: CompletionRequest) -> Result<String, RegideskError>;
}
