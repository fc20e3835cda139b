// SPDX-FileCopyrightText: 2026 Regidesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Anthropic Messages API request/response types.

use serde::{Deserialize, Serialize};

/// A request to the Anthropic Messages API.
#[derive(Debug, Clone, Serialize)]
pub struct MessageRequest {
    /// Model identifier (e.g., "claude-haiku-4-5-20250901").
    pub model: String,

    /// Conversation messages.
    pub messages: Vec<ApiMessage>,

    /// System prompt (optional).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    /// Maximum tokens to generate.
    pub max_tokens: u32,

    /// Sampling temperature.
    pub temperature: f32,
}

/// A single message in the Anthropic conversation format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiMessage {
    /// Role: "user" or "assistant".
    pub role: String,

    /// Plain text content.
    pub content: String,
}

/// A complete (non-streaming) Messages API response.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageResponse {
    pub id: String,
    pub model: String,
    pub content: Vec<ResponseContentBlock>,
    #[serde(default)]
    pub stop_reason: Option<String>,
    pub usage: ApiUsage,
}

/// A typed content block within a response.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum ResponseContentBlock {
    #[serde(rename = "text")]
    Text { text: String },
    /// Block types this adapter does not consume (tool use, thinking, etc.).
    #[serde(other)]
    Other,
}

/// Token usage reported by the API.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// Error envelope returned by the API on non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

/// The error detail within an [`ApiErrorResponse`].
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorDetail {
    #[serde(rename = "type")]
    pub type_: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_expected_shape() {
        let request = MessageRequest {
            model: "claude-haiku-4-5-20250901".into(),
            messages: vec![ApiMessage {
                role: "user".into(),
                content: "hello".into(),
            }],
            system: Some("Be brief.".into()),
            max_tokens: 512,
            temperature: 0.3,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "claude-haiku-4-5-20250901");
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["system"], "Be brief.");
        assert_eq!(json["max_tokens"], 512);
    }

    #[test]
    fn response_parses_text_and_unknown_blocks() {
        let body = r#"{
            "id": "msg_1",
            "model": "claude-haiku-4-5-20250901",
            "content": [
                {"type": "text", "text": "An answer."},
                {"type": "tool_use", "id": "t1", "name": "x", "input": {}}
            ],
            "stop_reason": "end_turn",
            "usage": {"input_tokens": 10, "output_tokens": 5}
        }"#;
        let parsed: MessageResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.content.len(), 2);
        assert!(matches!(
            &parsed.content[0],
            ResponseContentBlock::Text { text } if text == "An answer."
        ));
        assert!(matches!(parsed.content[1], ResponseContentBlock::Other));
        assert_eq!(parsed.usage.output_tokens, 5);
    }

    #[test]
    fn error_envelope_parses() {
        let body = r#"{"type":"error","error":{"type":"overloaded_error","message":"busy"}}"#;
        let parsed: ApiErrorResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.error.type_, "overloaded_error");
        assert_eq!(parsed.error.message, "busy");
    }
}
