// SPDX-FileCopyrightText: 2026 Regidesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Handlers for the public health endpoint and the chat endpoint.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use regidesk_core::{ConversationContext, Utterance};

use crate::server::GatewayState;

/// Longest message the chat endpoint accepts, in characters.
const MAX_MESSAGE_CHARS: usize = 1000;

/// Request body for POST /v1/chat.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// The user's message text.
    pub message: String,
    /// Context echoed back from a previous ticket offer.
    #[serde(default)]
    pub conversation_context: Option<ConversationContext>,
}

/// Success envelope wrapping handler data.
#[derive(Debug, Serialize)]
pub struct DataEnvelope<T> {
    pub success: bool,
    pub data: T,
}

impl<T> DataEnvelope<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Envelope for validation failures, one entry per offending field.
#[derive(Debug, Serialize)]
pub struct ErrorsEnvelope {
    pub success: bool,
    pub errors: Vec<FieldError>,
}

/// One field-level validation message.
#[derive(Debug, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Envelope for generic failures.
#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub success: bool,
    pub error: String,
}

pub(crate) fn validation_failed(errors: Vec<FieldError>) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(ErrorsEnvelope {
            success: false,
            errors,
        }),
    )
        .into_response()
}

pub(crate) fn internal_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorEnvelope {
            success: false,
            error: "internal server error".to_string(),
        }),
    )
        .into_response()
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}

/// GET /health (public, unauthenticated).
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

/// POST /v1/chat
///
/// Validates shape before the router runs: the message must be 1 to 1000
/// characters and the caller must identify itself via the `x-user-id`
/// header. Router errors surface as a generic 500; the detail is only
/// logged.
pub async fn post_chat(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    Json(body): Json<ChatRequest>,
) -> Response {
    let mut errors = Vec::new();

    let user_id = headers
        .get("x-user-id")
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty());
    if user_id.is_none() {
        errors.push(FieldError {
            field: "x-user-id",
            message: "x-user-id header is required".to_string(),
        });
    }

    if body.message.trim().is_empty() {
        errors.push(FieldError {
            field: "message",
            message: "message must not be empty".to_string(),
        });
    } else if body.message.chars().count() > MAX_MESSAGE_CHARS {
        errors.push(FieldError {
            field: "message",
            message: format!("message must be at most {MAX_MESSAGE_CHARS} characters"),
        });
    }

    if !errors.is_empty() {
        return validation_failed(errors);
    }
    let user_id = user_id.expect("validated above").to_string();

    let utterance = Utterance {
        message: body.message,
        user_id,
        context: body.conversation_context,
    };
    match state.router.route(&utterance).await {
        Ok(response) => Json(DataEnvelope::new(response)).into_response(),
        Err(error) => {
            tracing::error!(%error, "chat routing failed");
            internal_error()
        }
    }
}
