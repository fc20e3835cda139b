// SPDX-FileCopyrightText: 2026 Regidesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ticket CRUD operations.

use std::str::FromStr;

use chrono::Utc;
use rand::Rng;
use rusqlite::types::Type;
use rusqlite::{params, OptionalExtension};
use uuid::Uuid;

use regidesk_core::{
    NewTicket, RegideskError, Ticket, TicketCategory, TicketFilter, TicketPriority,
    TicketStatus, TicketUpdate,
};

use crate::database::Database;

const TICKET_COLUMNS: &str = "id, ticket_number, title, description, category, priority, \
     status, created_by, assigned_to, request_details, resolution, created_at, updated_at";

/// Attempts at generating a unique ticket number before giving up.
const NUMBER_ATTEMPTS: usize = 5;

const NUMBER_CHARSET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Insert a new ticket, generating its id, ticket number, and timestamps.
pub async fn create_ticket(db: &Database, new: &NewTicket) -> Result<Ticket, RegideskError> {
    let new = new.clone();
    db.connection()
        .call(move |conn| {
            let now = Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string();
            let details_json = serde_json::to_string(&new.request_details)
                .map_err(|e| tokio_rusqlite::Error::Other(Box::new(e)))?;
            let mut last_err = None;
            for _ in 0..NUMBER_ATTEMPTS {
                let ticket = Ticket {
                    id: Uuid::new_v4().to_string(),
                    ticket_number: generate_ticket_number(),
                    title: new.title.clone(),
                    description: new.description.clone(),
                    category: new.category,
                    priority: new.priority,
                    status: TicketStatus::Pending,
                    created_by: new.created_by.clone(),
                    assigned_to: None,
                    request_details: new.request_details.clone(),
                    resolution: None,
                    created_at: now.clone(),
                    updated_at: now.clone(),
                };
                let result = conn.execute(
                    "INSERT INTO tickets (id, ticket_number, title, description, category, \
                     priority, status, created_by, assigned_to, request_details, resolution, \
                     created_at, updated_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
                    params![
                        ticket.id,
                        ticket.ticket_number,
                        ticket.title,
                        ticket.description,
                        ticket.category.to_string(),
                        ticket.priority.to_string(),
                        ticket.status.to_string(),
                        ticket.created_by,
                        ticket.assigned_to,
                        details_json,
                        ticket.resolution,
                        ticket.created_at,
                        ticket.updated_at,
                    ],
                );
                match result {
                    Ok(_) => return Ok(ticket),
                    // Regenerate on a ticket-number collision, fail otherwise.
                    Err(e) if is_unique_violation(&e) => last_err = Some(e),
                    Err(e) => return Err(e.into()),
                }
            }
            Err(tokio_rusqlite::Error::Rusqlite(
                last_err.unwrap_or(rusqlite::Error::ExecuteReturnedResults),
            ))
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Find tickets matching a filter, newest first.
pub async fn find_tickets(
    db: &Database,
    filter: &TicketFilter,
) -> Result<Vec<Ticket>, RegideskError> {
    let filter = filter.clone();
    db.connection()
        .call(move |conn| {
            let (where_sql, values) = build_where(&filter);
            let mut sql = format!("SELECT {TICKET_COLUMNS} FROM tickets{where_sql} ORDER BY created_at DESC, id DESC");
            if let Some(limit) = filter.limit {
                sql.push_str(&format!(" LIMIT {limit}"));
                if let Some(offset) = filter.offset {
                    sql.push_str(&format!(" OFFSET {offset}"));
                }
            }
            let mut stmt = conn.prepare(&sql)?;
            let refs: Vec<&dyn rusqlite::ToSql> =
                values.iter().map(|v| v as &dyn rusqlite::ToSql).collect();
            let rows = stmt.query_map(refs.as_slice(), ticket_from_row)?;
            let mut tickets = Vec::new();
            for row in rows {
                tickets.push(row?);
            }
            Ok(tickets)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Count tickets matching a filter (limit and offset are ignored).
pub async fn count_tickets(db: &Database, filter: &TicketFilter) -> Result<u64, RegideskError> {
    let filter = filter.clone();
    db.connection()
        .call(move |conn| {
            let (where_sql, values) = build_where(&filter);
            let sql = format!("SELECT COUNT(*) FROM tickets{where_sql}");
            let refs: Vec<&dyn rusqlite::ToSql> =
                values.iter().map(|v| v as &dyn rusqlite::ToSql).collect();
            let count: i64 = conn.query_row(&sql, refs.as_slice(), |row| row.get(0))?;
            Ok(count as u64)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Look up a single ticket by its public number.
pub async fn get_ticket(
    db: &Database,
    ticket_number: &str,
) -> Result<Option<Ticket>, RegideskError> {
    let ticket_number = ticket_number.to_string();
    db.connection()
        .call(move |conn| {
            let ticket = conn
                .query_row(
                    &format!("SELECT {TICKET_COLUMNS} FROM tickets WHERE ticket_number = ?1"),
                    params![ticket_number],
                    ticket_from_row,
                )
                .optional()?;
            Ok(ticket)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Apply an admin update to a ticket and return the updated record.
pub async fn update_ticket(
    db: &Database,
    ticket_number: &str,
    update: &TicketUpdate,
) -> Result<Option<Ticket>, RegideskError> {
    let ticket_number = ticket_number.to_string();
    let update = update.clone();
    db.connection()
        .call(move |conn| {
            let mut sets = vec!["updated_at = strftime('%Y-%m-%dT%H:%M:%fZ','now')".to_string()];
            let mut values: Vec<String> = Vec::new();
            if let Some(status) = update.status {
                values.push(status.to_string());
                sets.push(format!("status = ?{}", values.len()));
            }
            if let Some(resolution) = update.resolution {
                values.push(resolution);
                sets.push(format!("resolution = ?{}", values.len()));
            }
            if let Some(assigned_to) = update.assigned_to {
                values.push(assigned_to);
                sets.push(format!("assigned_to = ?{}", values.len()));
            }
            values.push(ticket_number);
            let sql = format!(
                "UPDATE tickets SET {} WHERE ticket_number = ?{}",
                sets.join(", "),
                values.len()
            );
            let refs: Vec<&dyn rusqlite::ToSql> =
                values.iter().map(|v| v as &dyn rusqlite::ToSql).collect();
            let changed = conn.execute(&sql, refs.as_slice())?;
            if changed == 0 {
                return Ok(None);
            }
            let number = values.pop().unwrap_or_default();
            let ticket = conn.query_row(
                &format!("SELECT {TICKET_COLUMNS} FROM tickets WHERE ticket_number = ?1"),
                params![number],
                ticket_from_row,
            )?;
            Ok(Some(ticket))
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Shared WHERE-clause builder for find and count. Returns the SQL fragment
/// (with a leading " WHERE" when non-empty) and positional text parameters.
fn build_where(filter: &TicketFilter) -> (String, Vec<String>) {
    let mut clauses: Vec<String> = Vec::new();
    let mut values: Vec<String> = Vec::new();

    if let Some(created_by) = &filter.created_by {
        values.push(created_by.clone());
        clauses.push(format!("created_by = ?{}", values.len()));
    }
    if let Some(number) = &filter.ticket_number {
        values.push(number.clone());
        clauses.push(format!("ticket_number = ?{}", values.len()));
    }
    if let Some(status) = filter.status {
        values.push(status.to_string());
        clauses.push(format!("status = ?{}", values.len()));
    }
    if let Some(category) = filter.category {
        values.push(category.to_string());
        clauses.push(format!("category = ?{}", values.len()));
    }
    if let Some(priority) = filter.priority {
        values.push(priority.to_string());
        clauses.push(format!("priority = ?{}", values.len()));
    }
    if let Some(search) = &filter.search {
        values.push(format!("%{search}%"));
        let n = values.len();
        clauses.push(format!(
            "(title LIKE ?{n} OR description LIKE ?{n} OR ticket_number LIKE ?{n})"
        ));
    }

    if clauses.is_empty() {
        (String::new(), values)
    } else {
        (format!(" WHERE {}", clauses.join(" AND ")), values)
    }
}

fn generate_ticket_number() -> String {
    let date = Utc::now().format("%Y%m%d");
    let mut rng = rand::thread_rng();
    let suffix: String = (0..4)
        .map(|_| NUMBER_CHARSET[rng.gen_range(0..NUMBER_CHARSET.len())] as char)
        .collect();
    format!("TICKET-{date}-{suffix}")
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

/// Map a full ticket row in `TICKET_COLUMNS` order.
pub(crate) fn ticket_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Ticket> {
    let category: String = row.get(4)?;
    let priority: String = row.get(5)?;
    let status: String = row.get(6)?;
    let details_json: String = row.get(9)?;
    Ok(Ticket {
        id: row.get(0)?,
        ticket_number: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        category: TicketCategory::from_str(&category)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e)))?,
        priority: TicketPriority::from_str(&priority)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(e)))?,
        status: TicketStatus::from_str(&status)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(6, Type::Text, Box::new(e)))?,
        created_by: row.get(7)?,
        assigned_to: row.get(8)?,
        request_details: serde_json::from_str(&details_json)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(9, Type::Text, Box::new(e)))?,
        resolution: row.get(10)?,
        created_at: row.get(11)?,
        updated_at: row.get(12)?,
    })
}
