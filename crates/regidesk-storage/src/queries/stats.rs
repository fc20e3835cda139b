// SPDX-FileCopyrightText: 2026 Regidesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reporting aggregations for the admin surface.

use rusqlite::params;

use regidesk_core::{RegideskError, StatBucket, StatDimension};

use crate::database::Database;

/// Count tickets grouped by one dimension, largest bucket first.
pub async fn count_by(
    db: &Database,
    dimension: StatDimension,
) -> Result<Vec<StatBucket>, RegideskError> {
    let column = match dimension {
        StatDimension::Status => "status",
        StatDimension::Category => "category",
        StatDimension::Priority => "priority",
    };
    let sql = format!(
        "SELECT {column}, COUNT(*) FROM tickets GROUP BY {column} ORDER BY COUNT(*) DESC, {column} ASC"
    );
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map([], bucket_from_row)?;
            let mut buckets = Vec::new();
            for row in rows {
                buckets.push(row?);
            }
            Ok(buckets)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Tickets created per calendar day, newest day first, at most `days` rows.
pub async fn counts_by_day(db: &Database, days: u32) -> Result<Vec<StatBucket>, RegideskError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT date(created_at), COUNT(*) FROM tickets
                 GROUP BY date(created_at) ORDER BY date(created_at) DESC LIMIT ?1",
            )?;
            let rows = stmt.query_map(params![days], bucket_from_row)?;
            let mut buckets = Vec::new();
            for row in rows {
                buckets.push(row?);
            }
            Ok(buckets)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Tickets created per calendar month, newest month first, at most `months` rows.
pub async fn counts_by_month(db: &Database, months: u32) -> Result<Vec<StatBucket>, RegideskError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT strftime('%Y-%m', created_at), COUNT(*) FROM tickets
                 GROUP BY strftime('%Y-%m', created_at)
                 ORDER BY strftime('%Y-%m', created_at) DESC LIMIT ?1",
            )?;
            let rows = stmt.query_map(params![months], bucket_from_row)?;
            let mut buckets = Vec::new();
            for row in rows {
                buckets.push(row?);
            }
            Ok(buckets)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

fn bucket_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<StatBucket> {
    let count: i64 = row.get(1)?;
    Ok(StatBucket {
        key: row.get(0)?,
        count: count as u64,
    })
}
