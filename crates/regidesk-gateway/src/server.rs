// SPDX-FileCopyrightText: 2026 Regidesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::sync::Arc;

use axum::{
    middleware as axum_middleware,
    routing::{get, patch, post},
    Router,
};
use tower_http::cors::CorsLayer;

use regidesk_config::model::GatewayConfig;
use regidesk_core::{RegideskError, TicketStore};
use regidesk_router::IntentRouter;

use crate::auth::{auth_middleware, AuthConfig};
use crate::{admin, handlers};

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// The message intent router serving the chat endpoint.
    pub router: Arc<IntentRouter>,
    /// Ticket store serving the admin endpoints.
    pub store: Arc<dyn TicketStore>,
    /// Process start time for uptime reporting.
    pub start_time: std::time::Instant,
}

/// Build the full application router.
///
/// - `GET /health` is public.
/// - `POST /v1/chat` requires the chat bearer token.
/// - `/v1/tickets*` requires the admin bearer token.
pub fn build_app(config: &GatewayConfig, state: GatewayState) -> Router {
    let chat_auth = AuthConfig {
        token: config.bearer_token.clone(),
    };
    let admin_auth = AuthConfig {
        token: config.admin_token.clone(),
    };

    let public_routes = Router::new()
        .route("/health", get(handlers::get_health))
        .with_state(state.clone());

    let chat_routes = Router::new()
        .route("/v1/chat", post(handlers::post_chat))
        .route_layer(axum_middleware::from_fn_with_state(
            chat_auth,
            auth_middleware,
        ))
        .with_state(state.clone());

    let admin_routes = Router::new()
        .route("/v1/tickets", get(admin::list_tickets))
        .route("/v1/tickets/stats", get(admin::ticket_stats))
        .route("/v1/tickets/{number}", patch(admin::patch_ticket))
        .route_layer(axum_middleware::from_fn_with_state(
            admin_auth,
            auth_middleware,
        ))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(chat_routes)
        .merge(admin_routes)
        .layer(CorsLayer::permissive())
}

/// Start the gateway HTTP server and serve until the process exits.
pub async fn start_server(
    config: &GatewayConfig,
    state: GatewayState,
) -> Result<(), RegideskError> {
    let app = build_app(config, state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| RegideskError::Gateway {
            message: format!("failed to bind gateway to {addr}: {e}"),
            source: Some(Box::new(e)),
        })?;

    tracing::info!("gateway listening on {addr}");

    axum::serve(listener, app)
        .await
        .map_err(|e| RegideskError::Gateway {
            message: format!("gateway server error: {e}"),
            source: Some(Box::new(e)),
        })?;

    Ok(())
}
