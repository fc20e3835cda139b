// SPDX-FileCopyrightText: 2026 Regidesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./regidesk.toml` > `~/.config/regidesk/regidesk.toml`
//! > `/etc/regidesk/regidesk.toml` with environment variable overrides via
//! the `REGIDESK_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::RegideskConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/regidesk/regidesk.toml` (system-wide)
/// 3. `~/.config/regidesk/regidesk.toml` (user XDG config)
/// 4. `./regidesk.toml` (local directory)
/// 5. `REGIDESK_*` environment variables
pub fn load_config() -> Result<RegideskConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(RegideskConfig::default()))
        .merge(Toml::file("/etc/regidesk/regidesk.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("regidesk/regidesk.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("regidesk.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup).
///
/// Used for testing and for callers that hold config content in memory.
pub fn load_config_from_str(toml_content: &str) -> Result<RegideskConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(RegideskConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<RegideskConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(RegideskConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names. For example, `REGIDESK_GATEWAY_BEARER_TOKEN`
/// must map to `gateway.bearer_token`, not `gateway.bearer.token`.
fn env_provider() -> Env {
    Env::prefixed("REGIDESK_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: REGIDESK_GATEWAY_BEARER_TOKEN -> "gateway_bearer_token"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("agent_", "agent.", 1)
            .replacen("gateway_", "gateway.", 1)
            .replacen("anthropic_", "anthropic.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("catalog_", "catalog.", 1);
        mapped.into()
    })
}
