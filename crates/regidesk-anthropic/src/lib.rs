// SPDX-FileCopyrightText: 2026 Regidesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Anthropic Claude adapter for the router's completion fallback.

pub mod client;
pub mod types;

use async_trait::async_trait;
use tracing::debug;

use regidesk_config::model::AnthropicConfig;
use regidesk_core::{
    AdapterType, CompletionProvider, CompletionRequest, HealthStatus, PluginAdapter,
    RegideskError,
};

use crate::client::AnthropicClient;
use crate::types::{ApiMessage, MessageRequest, ResponseContentBlock};

/// Completion provider backed by the Anthropic Messages API.
#[derive(Debug)]
pub struct AnthropicFallback {
    client: AnthropicClient,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl AnthropicFallback {
    /// Build the provider from configuration.
    ///
    /// Fails when no API key is configured; callers that want the degraded
    /// no-provider mode should not construct the adapter at all.
    pub fn new(config: &AnthropicConfig) -> Result<Self, RegideskError> {
        let api_key = config.api_key.as_deref().ok_or_else(|| {
            RegideskError::Config("anthropic.api_key is not configured".to_string())
        })?;
        let client = AnthropicClient::new(api_key, &config.api_version)?;
        Ok(Self {
            client,
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        })
    }

    #[cfg(test)]
    fn with_base_url(mut self, url: String) -> Self {
        self.client = self.client.with_base_url(url);
        self
    }
}

#[async_trait]
impl PluginAdapter for AnthropicFallback {
    fn name(&self) -> &str {
        "anthropic"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, RegideskError> {
        // No connectivity probe: a spurious completion call costs tokens.
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), RegideskError> {
        Ok(())
    }
}

#[async_trait]
impl CompletionProvider for AnthropicFallback {
    async fn complete(&self, request: CompletionRequest) -> Result<String, RegideskError> {
        let api_request = MessageRequest {
            model: self.model.clone(),
            messages: vec![ApiMessage {
                role: "user".to_string(),
                content: request.user_message,
            }],
            system: Some(request.system),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };
        let response = self.client.send_message(&api_request).await?;
        debug!(
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            "completion finished"
        );
        let text = response
            .content
            .iter()
            .find_map(|block| match block {
                ResponseContentBlock::Text { text } => Some(text.trim().to_string()),
                ResponseContentBlock::Other => None,
            })
            .ok_or_else(|| RegideskError::Provider {
                message: "completion response contained no text block".to_string(),
                source: None,
            })?;
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_with_key() -> AnthropicConfig {
        AnthropicConfig {
            api_key: Some("test-key".to_string()),
            ..Default::default()
        }
    }

    fn request() -> CompletionRequest {
        CompletionRequest {
            system: "You are a registrar assistant.".to_string(),
            user_message: "What is a CAV?".to_string(),
        }
    }

    #[test]
    fn missing_api_key_is_a_config_error() {
        let err = AnthropicFallback::new(&AnthropicConfig::default()).unwrap_err();
        assert!(matches!(err, RegideskError::Config(_)));
    }

    #[tokio::test]
    async fn complete_sends_headers_and_extracts_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .and(header("x-api-key", "test-key"))
            .and(header("anthropic-version", "2023-06-01"))
            .and(body_partial_json(json!({
                "model": "claude-haiku-4-5-20250901",
                "system": "You are a registrar assistant.",
                "max_tokens": 512
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "msg_1",
                "model": "claude-haiku-4-5-20250901",
                "content": [{"type": "text", "text": "  A Certification, Authentication, and Verification document.  "}],
                "stop_reason": "end_turn",
                "usage": {"input_tokens": 12, "output_tokens": 9}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let provider = AnthropicFallback::new(&config_with_key())
            .unwrap()
            .with_base_url(format!("{}/v1/messages", server.uri()));
        let text = provider.complete(request()).await.unwrap();
        assert_eq!(
            text,
            "A Certification, Authentication, and Verification document."
        );
    }

    #[tokio::test]
    async fn api_error_is_reported_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .respond_with(ResponseTemplate::new(529).set_body_json(json!({
                "type": "error",
                "error": {"type": "overloaded_error", "message": "Overloaded"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let provider = AnthropicFallback::new(&config_with_key())
            .unwrap()
            .with_base_url(format!("{}/v1/messages", server.uri()));
        let err = provider.complete(request()).await.unwrap_err();
        match err {
            RegideskError::Provider { message, .. } => {
                assert!(message.contains("overloaded_error"));
                assert!(message.contains("Overloaded"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn response_without_text_block_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "msg_2",
                "model": "claude-haiku-4-5-20250901",
                "content": [],
                "stop_reason": "end_turn",
                "usage": {"input_tokens": 3, "output_tokens": 0}
            })))
            .mount(&server)
            .await;

        let provider = AnthropicFallback::new(&config_with_key())
            .unwrap()
            .with_base_url(format!("{}/v1/messages", server.uri()));
        assert!(provider.complete(request()).await.is_err());
    }
}
