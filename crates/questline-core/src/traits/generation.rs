// SPDX-FileCopyrightText: 2026 Questline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Generation backend trait for text-completion integrations.

use async_trait::async_trait;

use crate::error::QuestlineError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{ChatTurn, Completion};

/// Adapter for the external text-generation service.
///
/// One call to [`complete`](GenerationBackend::complete) is one logical
/// generation request: the backend appends a prompt-specific user turn to
/// the supplied context, then drives its bounded attempt loop. Degraded
/// outcomes surface as [`Completion::Busy`], never as an error; transport
/// failures (the request could not be sent at all) propagate as
/// [`QuestlineError::Backend`].
#[async_trait]
pub trait GenerationBackend: PluginAdapter {
    async fn complete(
        &self,
        context: &[ChatTurn],
        prompt: &str,
        temperature: f64,
    ) -> Result<Completion, QuestlineError>;
}
