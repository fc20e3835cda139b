// SPDX-FileCopyrightText: 2026 Regidesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the TicketStore trait.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use regidesk_config::model::StorageConfig;
use regidesk_core::{
    AdapterType, HealthStatus, NewTicket, PluginAdapter, RegideskError, StatBucket,
    StatDimension, Ticket, TicketFilter, TicketStore, TicketUpdate,
};

use crate::database::Database;
use crate::queries;

/// SQLite-backed ticket store.
///
/// Wraps a [`Database`] handle and delegates all query operations to the
/// typed query modules. The database is opened lazily on the first call to
/// [`SqliteStorage::initialize`].
pub struct SqliteStorage {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStorage {
    /// Create a new SqliteStorage with the given configuration.
    ///
    /// The database connection is not opened until [`initialize`] is called.
    ///
    /// [`initialize`]: SqliteStorage::initialize
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Open the database, apply PRAGMAs, and run migrations.
    pub async fn initialize(&self) -> Result<(), RegideskError> {
        let db = Database::open(&self.config.database_path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| RegideskError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    fn db(&self) -> Result<&Database, RegideskError> {
        self.db.get().ok_or_else(|| RegideskError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }
}

#[async_trait]
impl PluginAdapter for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, RegideskError> {
        let db = self.db()?;
        db.connection()
            .call(|conn| {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(crate::database::map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), RegideskError> {
        if let Some(db) = self.db.get() {
            db.checkpoint().await?;
            debug!("shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl TicketStore for SqliteStorage {
    async fn create_ticket(&self, new: &NewTicket) -> Result<Ticket, RegideskError> {
        queries::tickets::create_ticket(self.db()?, new).await
    }

    async fn find_tickets(&self, filter: &TicketFilter) -> Result<Vec<Ticket>, RegideskError> {
        queries::tickets::find_tickets(self.db()?, filter).await
    }

    async fn count_tickets(&self, filter: &TicketFilter) -> Result<u64, RegideskError> {
        queries::tickets::count_tickets(self.db()?, filter).await
    }

    async fn get_ticket(&self, ticket_number: &str) -> Result<Option<Ticket>, RegideskError> {
        queries::tickets::get_ticket(self.db()?, ticket_number).await
    }

    async fn update_ticket(
        &self,
        ticket_number: &str,
        update: &TicketUpdate,
    ) -> Result<Option<Ticket>, RegideskError> {
        queries::tickets::update_ticket(self.db()?, ticket_number, update).await
    }

    async fn count_by(&self, dimension: StatDimension) -> Result<Vec<StatBucket>, RegideskError> {
        queries::stats::count_by(self.db()?, dimension).await
    }

    async fn counts_by_day(&self, days: u32) -> Result<Vec<StatBucket>, RegideskError> {
        queries::stats::counts_by_day(self.db()?, days).await
    }

    async fn counts_by_month(&self, months: u32) -> Result<Vec<StatBucket>, RegideskError> {
        queries::stats::counts_by_month(self.db()?, months).await
    }
}
