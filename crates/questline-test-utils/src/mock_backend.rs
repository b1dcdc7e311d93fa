// SPDX-FileCopyrightText: 2026 Questline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock generation backend for deterministic testing.
//!
//! `MockBackend` implements `GenerationBackend` with pre-configured
//! completions, enabling fast, CI-runnable tests without external API
//! calls.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use questline_core::types::{AdapterType, ChatTurn, Completion, HealthStatus};
use questline_core::{GenerationBackend, PluginAdapter, QuestlineError};

/// A mock generation backend that returns pre-configured completions.
///
/// Completions are popped from a FIFO queue. When the queue is empty, a
/// default "mock response" reply is returned. Every call's prompt and
/// temperature are recorded for assertions.
pub struct MockBackend {
    completions: Arc<Mutex<VecDeque<Completion>>>,
    calls: Arc<Mutex<Vec<(String, f64)>>>,
}

impl MockBackend {
    /// Create a new mock backend with an empty completion queue.
    pub fn new() -> Self {
        Self {
            completions: Arc::new(Mutex::new(VecDeque::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a mock backend pre-loaded with the given completions.
    pub fn with_completions(completions: Vec<Completion>) -> Self {
        Self {
            completions: Arc::new(Mutex::new(VecDeque::from(completions))),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Add a completion to the end of the queue.
    pub async fn push(&self, completion: Completion) {
        self.completions.lock().await.push_back(completion);
    }

    /// Every `(prompt, temperature)` pair seen so far, in call order.
    pub async fn calls(&self) -> Vec<(String, f64)> {
        self.calls.lock().await.clone()
    }

    /// Number of generation calls made.
    pub async fn call_count(&self) -> usize {
        self.calls.lock().await.len()
    }

    async fn next_completion(&self) -> Completion {
        self.completions
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Completion::Reply("mock response".to_string()))
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockBackend {
    fn name(&self) -> &str {
        "mock-backend"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Generation
    }

    async fn health_check(&self) -> Result<HealthStatus, QuestlineError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), QuestlineError> {
        Ok(())
    }
}

#[async_trait]
impl GenerationBackend for MockBackend {
    async fn complete(
        &self,
        _context: &[ChatTurn],
        prompt: &str,
        temperature: f64,
    ) -> Result<Completion, QuestlineError> {
        self.calls
            .lock()
            .await
            .push((prompt.to_string(), temperature));
        Ok(self.next_completion().await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn completions_pop_in_fifo_order() {
        let backend = MockBackend::with_completions(vec![
            Completion::Reply("first".into()),
            Completion::Busy,
        ]);
        let first = backend.complete(&[], "p1", 0.7).await.unwrap();
        let second = backend.complete(&[], "p2", 0.9).await.unwrap();
        assert_eq!(first, Completion::Reply("first".into()));
        assert_eq!(second, Completion::Busy);
    }

    #[tokio::test]
    async fn empty_queue_yields_the_default_reply() {
        let backend = MockBackend::new();
        let completion = backend.complete(&[], "p", 0.7).await.unwrap();
        assert_eq!(completion, Completion::Reply("mock response".into()));
    }

    #[tokio::test]
    async fn calls_are_recorded_with_temperatures() {
        let backend = MockBackend::new();
        backend.complete(&[], "validate", 0.7).await.unwrap();
        backend.complete(&[], "narrate", 0.9).await.unwrap();
        assert_eq!(
            backend.calls().await,
            vec![("validate".to_string(), 0.7), ("narrate".to_string(), 0.9)]
        );
        assert_eq!(backend.call_count().await, 2);
    }
}
