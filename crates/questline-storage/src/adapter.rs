// SPDX-FileCopyrightText: 2026 Questline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the ChainStore trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::OnceCell;
use tracing::debug;

use questline_config::model::StorageConfig;
use questline_core::types::{AiMessage, Chain, ChatTurn, ChatUser, RateWindow, TurnKind, UserMessage};
use questline_core::{AdapterType, ChainStore, HealthStatus, PluginAdapter, QuestlineError};

use crate::database::Database;
use crate::queries;

/// SQLite-backed chain store.
///
/// Wraps a [`Database`] handle and delegates all query operations to the
/// typed query modules. The database is lazily initialized on the first
/// call to [`ChainStore::initialize`].
pub struct SqliteChainStore {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteChainStore {
    /// Create a new SqliteChainStore with the given configuration.
    ///
    /// The database connection is not opened until [`ChainStore::initialize`]
    /// is called.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// The underlying database handle, if initialized. Exposed for
    /// diagnostics and test assertions against the audit log.
    pub fn database(&self) -> Option<&Database> {
        self.db.get()
    }

    /// Returns a reference to the underlying Database, or an error if not initialized.
    fn db(&self) -> Result<&Database, QuestlineError> {
        self.db.get().ok_or_else(|| QuestlineError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }
}

#[async_trait]
impl PluginAdapter for SqliteChainStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, QuestlineError> {
        let db = self.db()?;
        db.connection()
            .call(|conn| {
                conn.query_row("SELECT 1", [], |_row| Ok(()))?;
                Ok(())
            })
            .await
            .map_err(crate::database::map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), QuestlineError> {
        // Shutdown delegates to close if the DB was initialized.
        if let Some(db) = self.db.get() {
            db.close().await?;
            debug!("shutdown: storage closed");
        }
        Ok(())
    }
}

#[async_trait]
impl ChainStore for SqliteChainStore {
    async fn initialize(&self) -> Result<(), QuestlineError> {
        let db = Database::open(&self.config.database_path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| QuestlineError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite chain store initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), QuestlineError> {
        self.db()?.close().await
    }

    async fn get_or_create_user(
        &self,
        external_id: &str,
        display_name: &str,
    ) -> Result<ChatUser, QuestlineError> {
        queries::users::get_or_create_user(self.db()?, external_id, display_name).await
    }

    async fn current_chain(&self, user_id: &str) -> Result<Option<Chain>, QuestlineError> {
        queries::chains::current_chain(self.db()?, user_id).await
    }

    async fn create_chain(&self, chain: &Chain) -> Result<(), QuestlineError> {
        queries::chains::create_chain(self.db()?, chain).await
    }

    async fn context(&self, chain: &Chain) -> Result<Vec<ChatTurn>, QuestlineError> {
        queries::turns::chain_context(self.db()?, chain).await
    }

    async fn insert_user_message(&self, msg: &UserMessage) -> Result<(), QuestlineError> {
        queries::messages::insert_user_message(self.db()?, msg).await
    }

    async fn charge_user_message(&self, message_id: &str) -> Result<(), QuestlineError> {
        queries::messages::charge_user_message(self.db()?, message_id).await
    }

    async fn insert_ai_message(&self, msg: &AiMessage) -> Result<(), QuestlineError> {
        queries::messages::insert_ai_message(self.db()?, msg).await
    }

    async fn record_turn(
        &self,
        chain_id: &str,
        user_message_id: &str,
        ai_message_id: &str,
        kind: TurnKind,
    ) -> Result<(), QuestlineError> {
        queries::turns::record_turn(self.db()?, chain_id, user_message_id, ai_message_id, kind)
            .await
    }

    async fn rate_limit_window(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<RateWindow, QuestlineError> {
        queries::messages::rate_limit_window(self.db()?, user_id, now).await
    }

    async fn append_generation_log(
        &self,
        request_json: &str,
        response_json: &str,
    ) -> Result<(), QuestlineError> {
        queries::generation_log::append(self.db()?, request_json, response_json).await
    }
}
