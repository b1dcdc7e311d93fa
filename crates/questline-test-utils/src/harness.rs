// SPDX-FileCopyrightText: 2026 Questline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end turn-controller testing.
//!
//! `TestHarness` assembles a real SQLite chain store on a temp directory,
//! a mock generation backend, and a turn controller. `send()` drives the
//! full pipeline as a fixed test user.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use questline_config::model::{AdventureConfig, LimitConfig, SeedConfig, StorageConfig};
use questline_core::types::{Completion, InboundMessage, OutboundMessage};
use questline_core::{ChainStore, QuestlineError};
use questline_engine::TurnController;
use questline_storage::SqliteChainStore;

use crate::mock_backend::MockBackend;

/// External id of the harness's fixed test user.
pub const TEST_USER_ID: &str = "U-test";

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    completions: Vec<Completion>,
    hourly_message_limit: i64,
    adventure: AdventureConfig,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            completions: Vec::new(),
            hourly_message_limit: 10,
            adventure: AdventureConfig::default(),
        }
    }

    /// Pre-load the mock backend's completion queue.
    pub fn with_completions(mut self, completions: Vec<Completion>) -> Self {
        self.completions = completions;
        self
    }

    /// Override the hourly message limit.
    pub fn with_hourly_limit(mut self, limit: i64) -> Self {
        self.hourly_message_limit = limit;
        self
    }

    /// Replace the seed pool; a single seed makes `!start` deterministic.
    pub fn with_seeds(mut self, seeds: Vec<SeedConfig>) -> Self {
        self.adventure.seeds = seeds;
        self
    }

    /// Replace the whole adventure configuration.
    pub fn with_adventure(mut self, adventure: AdventureConfig) -> Self {
        self.adventure = adventure;
        self
    }

    /// Build the test harness, creating the temp database.
    pub async fn build(self) -> Result<TestHarness, QuestlineError> {
        let temp_dir =
            tempfile::TempDir::new().map_err(|e| QuestlineError::Storage { source: e.into() })?;
        let db_path = temp_dir.path().join("test.db");

        let store = Arc::new(SqliteChainStore::new(StorageConfig {
            database_path: db_path.to_string_lossy().to_string(),
            wal_mode: true,
        }));
        store.initialize().await?;

        let backend = Arc::new(if self.completions.is_empty() {
            MockBackend::new()
        } else {
            MockBackend::with_completions(self.completions)
        });

        let controller = TurnController::new(
            store.clone(),
            backend.clone(),
            LimitConfig {
                hourly_message_limit: self.hourly_message_limit,
            },
            self.adventure,
        );

        Ok(TestHarness {
            store,
            backend,
            controller,
            _temp_dir: temp_dir,
        })
    }
}

/// A complete test environment: real storage, mock generation, and the
/// turn controller wired together.
pub struct TestHarness {
    /// The SQLite chain store (temp DB, cleaned up on drop).
    pub store: Arc<SqliteChainStore>,
    /// The mock generation backend.
    pub backend: Arc<MockBackend>,
    /// The turn controller under test.
    pub controller: TurnController,
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    /// Create a new builder for configuring the test harness.
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Send a message as the fixed test user, stamped with the current time.
    pub async fn send(&self, text: &str) -> Result<OutboundMessage, QuestlineError> {
        self.send_at(text, Utc::now()).await
    }

    /// Send a message as the fixed test user at a chosen instant.
    pub async fn send_at(
        &self,
        text: &str,
        now: DateTime<Utc>,
    ) -> Result<OutboundMessage, QuestlineError> {
        let inbound = InboundMessage {
            sender_external_id: TEST_USER_ID.to_string(),
            sender_name: "tester".to_string(),
            content: text.to_string(),
        };
        self.controller.handle_message(&inbound, now).await
    }

    /// The fixed test user's internal id, creating the row if needed.
    pub async fn test_user_id(&self) -> Result<String, QuestlineError> {
        let user = self.store.get_or_create_user(TEST_USER_ID, "tester").await?;
        Ok(user.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn builder_creates_working_environment() {
        let harness = TestHarness::builder().build().await.unwrap();
        let user_id = harness.test_user_id().await.unwrap();
        assert!(harness.store.current_chain(&user_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn send_drives_the_controller() {
        let harness = TestHarness::builder().build().await.unwrap();
        let reply = harness.send("!help").await.unwrap();
        assert_eq!(reply.recipient_external_id, TEST_USER_ID);
        assert!(reply.text.contains("!start"));
    }

    #[tokio::test]
    async fn temp_db_is_unique_per_harness() {
        let h1 = TestHarness::builder().build().await.unwrap();
        let h2 = TestHarness::builder().build().await.unwrap();

        h1.send("hello").await.unwrap();
        let u2 = h2.test_user_id().await.unwrap();
        let window = h2
            .store
            .rate_limit_window(&u2, Utc::now())
            .await
            .unwrap();
        assert_eq!(window.oldest, None, "h2 must not see h1's messages");
    }
}
