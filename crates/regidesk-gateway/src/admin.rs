// SPDX-FileCopyrightText: 2026 Regidesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Admin handlers: ticket listing, updates, and reporting stats.

use std::str::FromStr;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use regidesk_core::{
    StatBucket, StatDimension, Ticket, TicketCategory, TicketFilter, TicketPriority,
    TicketStatus, TicketUpdate,
};

use crate::handlers::{
    internal_error, validation_failed, DataEnvelope, ErrorEnvelope, FieldError,
};
use crate::server::GatewayState;

const DEFAULT_PER_PAGE: i64 = 20;
const MAX_PER_PAGE: i64 = 100;

/// Query parameters for GET /v1/tickets.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub page: Option<i64>,
    #[serde(default)]
    pub per_page: Option<i64>,
}

/// Response body for GET /v1/tickets.
#[derive(Debug, Serialize)]
pub struct TicketListData {
    pub tickets: Vec<Ticket>,
    pub total: u64,
    pub page: i64,
    pub per_page: i64,
}

/// Response body for GET /v1/tickets/stats.
#[derive(Debug, Serialize)]
pub struct TicketStatsData {
    pub by_status: Vec<StatBucket>,
    pub by_category: Vec<StatBucket>,
    pub by_priority: Vec<StatBucket>,
    pub by_day: Vec<StatBucket>,
    pub by_month: Vec<StatBucket>,
}

/// GET /v1/tickets
pub async fn list_tickets(
    State(state): State<GatewayState>,
    Query(query): Query<ListQuery>,
) -> Response {
    let mut errors = Vec::new();
    let status = parse_enum::<TicketStatus>(&query.status, "status", &mut errors);
    let category = parse_enum::<TicketCategory>(&query.category, "category", &mut errors);
    let priority = parse_enum::<TicketPriority>(&query.priority, "priority", &mut errors);
    if !errors.is_empty() {
        return validation_failed(errors);
    }

    let page = query.page.unwrap_or(1).max(1);
    let per_page = query
        .per_page
        .unwrap_or(DEFAULT_PER_PAGE)
        .clamp(1, MAX_PER_PAGE);

    let filter = TicketFilter {
        created_by: query.created_by,
        status,
        category,
        priority,
        search: query.search,
        limit: Some(per_page),
        offset: Some((page - 1) * per_page),
        ..Default::default()
    };
    let result = async {
        let tickets = state.store.find_tickets(&filter).await?;
        let total = state.store.count_tickets(&filter).await?;
        Ok::<_, regidesk_core::RegideskError>((tickets, total))
    }
    .await;

    match result {
        Ok((tickets, total)) => Json(DataEnvelope::new(TicketListData {
            tickets,
            total,
            page,
            per_page,
        }))
        .into_response(),
        Err(error) => {
            tracing::error!(%error, "ticket listing failed");
            internal_error()
        }
    }
}

/// GET /v1/tickets/stats
pub async fn ticket_stats(State(state): State<GatewayState>) -> Response {
    let result = async {
        Ok::<_, regidesk_core::RegideskError>(TicketStatsData {
            by_status: state.store.count_by(StatDimension::Status).await?,
            by_category: state.store.count_by(StatDimension::Category).await?,
            by_priority: state.store.count_by(StatDimension::Priority).await?,
            by_day: state.store.counts_by_day(30).await?,
            by_month: state.store.counts_by_month(12).await?,
        })
    }
    .await;

    match result {
        Ok(stats) => Json(DataEnvelope::new(stats)).into_response(),
        Err(error) => {
            tracing::error!(%error, "ticket stats failed");
            internal_error()
        }
    }
}

/// PATCH /v1/tickets/{number}
pub async fn patch_ticket(
    State(state): State<GatewayState>,
    Path(number): Path<String>,
    Json(update): Json<TicketUpdate>,
) -> Response {
    match state.store.update_ticket(&number, &update).await {
        Ok(Some(ticket)) => Json(DataEnvelope::new(ticket)).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ErrorEnvelope {
                success: false,
                error: format!("ticket {number} not found"),
            }),
        )
            .into_response(),
        Err(error) => {
            tracing::error!(%error, ticket_number = %number, "ticket update failed");
            internal_error()
        }
    }
}

fn parse_enum<T: FromStr>(
    raw: &Option<String>,
    field: &'static str,
    errors: &mut Vec<FieldError>,
) -> Option<T> {
    let raw = raw.as_deref()?;
    match T::from_str(raw) {
        Ok(value) => Some(value),
        Err(_) => {
            errors.push(FieldError {
                field,
                message: format!("unknown {field} '{raw}'"),
            });
            None
        }
    }
}
