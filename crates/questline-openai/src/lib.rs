// SPDX-FileCopyrightText: 2026 Questline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI chat-completion backend for the Questline adventure bot.
//!
//! Implements the [`GenerationBackend`] trait over the chat-completions
//! HTTP API with bounded retry and a full audit trail: every attempt's
//! request and raw response body is appended to the chain store's
//! generation log before the outcome is acted on.

pub mod client;
pub mod types;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use questline_config::model::OpenAiConfig;
use questline_core::types::{ChatTurn, Completion, Role};
use questline_core::{
    AdapterType, ChainStore, GenerationBackend, HealthStatus, PluginAdapter, QuestlineError,
};

use client::{AttemptOutcome, OpenAiClient};
use types::ChatCompletionRequest;

pub use client::classify;

/// Generation backend over the OpenAI chat-completions API.
pub struct OpenAiBackend {
    client: OpenAiClient,
    model: String,
    attempt_limit: u32,
    store: Arc<dyn ChainStore>,
}

impl OpenAiBackend {
    /// Build a backend from configuration. Fails if no API key is set.
    pub fn new(config: &OpenAiConfig, store: Arc<dyn ChainStore>) -> Result<Self, QuestlineError> {
        let api_key = config
            .api_key
            .as_deref()
            .ok_or_else(|| QuestlineError::Config("openai.api_key is not set".into()))?;
        Ok(Self {
            client: OpenAiClient::new(api_key)?,
            model: config.model.clone(),
            attempt_limit: config.attempt_limit.max(1),
            store,
        })
    }

    #[cfg(test)]
    fn with_base_url(mut self, url: String) -> Self {
        self.client = self.client.with_base_url(url);
        self
    }
}

#[async_trait]
impl PluginAdapter for OpenAiBackend {
    fn name(&self) -> &str {
        "openai"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Generation
    }

    async fn health_check(&self) -> Result<HealthStatus, QuestlineError> {
        // No probe endpoint worth the cost of a completion; construction
        // already validated the credentials shape.
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), QuestlineError> {
        Ok(())
    }
}

#[async_trait]
impl GenerationBackend for OpenAiBackend {
    async fn complete(
        &self,
        context: &[ChatTurn],
        prompt: &str,
        temperature: f64,
    ) -> Result<Completion, QuestlineError> {
        let mut messages = context.to_vec();
        messages.push(ChatTurn::new(Role::User, prompt));
        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages,
            temperature,
        };
        let request_json =
            serde_json::to_string(&request).map_err(|e| QuestlineError::Backend {
                message: format!("failed to serialize request: {e}"),
                source: Some(Box::new(e)),
            })?;

        for attempt in 1..=self.attempt_limit {
            let body = self.client.send(&request).await?;
            self.store.append_generation_log(&request_json, &body).await?;

            match classify(&body) {
                AttemptOutcome::Success(text) => {
                    debug!(attempt, "completion succeeded");
                    return Ok(Completion::Reply(text));
                }
                AttemptOutcome::Retryable(reason) => {
                    warn!(attempt, %reason, "server error, retrying");
                }
                AttemptOutcome::Fatal(reason) => {
                    warn!(attempt, %reason, "fatal generation error");
                    return Ok(Completion::Busy);
                }
            }
        }

        warn!(attempts = self.attempt_limit, "generation attempts exhausted");
        Ok(Completion::Busy)
    }
}
