// SPDX-FileCopyrightText: 2026 Regidesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `regidesk serve` command implementation.
//!
//! Wires the SQLite store, the catalogs, the optional Anthropic fallback,
//! and the intent router into the HTTP gateway, then serves until the
//! process receives an interrupt.

use std::sync::Arc;

use tracing::{info, warn};

use regidesk_anthropic::AnthropicFallback;
use regidesk_catalog::Catalogs;
use regidesk_config::model::RegideskConfig;
use regidesk_core::{CompletionProvider, PluginAdapter, RegideskError, TicketStore};
use regidesk_gateway::{start_server, GatewayState};
use regidesk_router::IntentRouter;
use regidesk_storage::SqliteStorage;

/// Runs the `regidesk serve` command.
pub async fn run_serve(config: RegideskConfig) -> Result<(), RegideskError> {
    init_tracing(&config.agent.log_level);

    info!("starting regidesk serve");

    let storage = Arc::new(SqliteStorage::new(config.storage.clone()));
    storage.initialize().await?;
    let store: Arc<dyn TicketStore> = storage.clone();

    let catalogs = Arc::new(Catalogs::load(&config.catalog)?);

    let provider: Option<Arc<dyn CompletionProvider>> = if config.anthropic.api_key.is_some() {
        let fallback = AnthropicFallback::new(&config.anthropic)?;
        info!(model = %config.anthropic.model, "completion fallback enabled");
        Some(Arc::new(fallback))
    } else {
        warn!("no anthropic.api_key configured -- fallback replies are canned");
        None
    };

    let router = Arc::new(IntentRouter::new(
        config.agent.name.clone(),
        catalogs,
        store.clone(),
        provider,
    ));

    let state = GatewayState {
        router,
        store,
        start_time: std::time::Instant::now(),
    };

    let result = tokio::select! {
        result = start_server(&config.gateway, state) => result,
        _ = tokio::signal::ctrl_c() => {
            info!("interrupt received, shutting down");
            Ok(())
        }
    };

    storage.shutdown().await?;
    result
}

fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("regidesk={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
