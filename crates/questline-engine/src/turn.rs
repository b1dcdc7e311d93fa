// SPDX-FileCopyrightText: 2026 Questline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The turn controller: one inbound message in, one reply out.
//!
//! Every inbound message is persisted before anything else, commands are
//! dispatched without touching the generation backend, and freeform text
//! runs the adventure pipeline: rate gate, context assembly, validity
//! check, narrative continuation.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use tracing::{debug, warn};
use uuid::Uuid;

use questline_config::model::{AdventureConfig, LimitConfig};
use questline_core::time::format_rfc3339;
use questline_core::types::{
    AiMessage, Chain, ChatTurn, ChatUser, Completion, InboundMessage, OutboundMessage, Role,
    TurnKind, UserMessage,
};
use questline_core::{ChainStore, GenerationBackend, QuestlineError};

use crate::commands::{Command, help_text};
use crate::context::truncate;
use crate::limiter::{self, RateDecision};

/// Reply when a freeform message or `!repeat` arrives with no chain.
pub const NOT_ON_ADVENTURE: &str =
    "You are currently not on an adventure. Use !start to begin one or !help for more options.";

/// Reply when `!start` arrives while a chain exists.
pub const ON_ADVENTURE: &str =
    "You are currently on an adventure. Use !repeat to see the last message.";

/// Reply when the backend could not produce a completion.
pub const BUSY_REPLY: &str =
    "Oops, I'm a bit busy right now. I should be ready in a minute or so...";

/// Marker the validity check is instructed to emit for rejected actions.
pub const REJECTION_MARKER: &str = "You can't do that!";

/// Marker of a generic assistant disclaimer in a narrative reply.
pub const REFUSAL_MARKER: &str = "AI language model";

/// Orchestrates one turn of the adventure bot.
pub struct TurnController {
    store: Arc<dyn ChainStore>,
    backend: Arc<dyn GenerationBackend>,
    limits: LimitConfig,
    adventure: AdventureConfig,
}

impl TurnController {
    pub fn new(
        store: Arc<dyn ChainStore>,
        backend: Arc<dyn GenerationBackend>,
        limits: LimitConfig,
        adventure: AdventureConfig,
    ) -> Self {
        Self {
            store,
            backend,
            limits,
            adventure,
        }
    }

    /// Handle one inbound message and produce the reply.
    ///
    /// `now` is the turn's clock reading; it stamps the persisted messages
    /// and anchors the rate-limit window.
    pub async fn handle_message(
        &self,
        inbound: &InboundMessage,
        now: DateTime<Utc>,
    ) -> Result<OutboundMessage, QuestlineError> {
        let user = self
            .store
            .get_or_create_user(&inbound.sender_external_id, &inbound.sender_name)
            .await?;
        debug!(user_id = %user.id, content = %inbound.content, "handling message");

        let message = UserMessage {
            id: Uuid::new_v4().to_string(),
            user_id: user.id.clone(),
            content: inbound.content.clone(),
            rate_limit_cost: 0,
            created_at: format_rfc3339(now),
        };
        self.store.insert_user_message(&message).await?;

        let text = if inbound.content.starts_with('!') {
            self.handle_command(&user, &message, now).await?
        } else {
            self.handle_adventure_turn(&user, &message, now).await?
        };

        Ok(OutboundMessage {
            recipient_external_id: user.external_id.clone(),
            text,
        })
    }

    async fn handle_command(
        &self,
        user: &ChatUser,
        message: &UserMessage,
        now: DateTime<Utc>,
    ) -> Result<String, QuestlineError> {
        match Command::parse(&message.content) {
            Command::Help => Ok(help_text()),
            Command::Repeat => self.repeat_last_message(user).await,
            Command::Start => self.start_adventure(user, message, now).await,
            Command::Unknown(content) => Ok(format!(
                "{content} is not a valid command. Type !help for valid commands."
            )),
        }
    }

    async fn repeat_last_message(&self, user: &ChatUser) -> Result<String, QuestlineError> {
        let Some(chain) = self.store.current_chain(&user.id).await? else {
            return Ok(NOT_ON_ADVENTURE.to_string());
        };
        let context = self.store.context(&chain).await?;
        match context.last() {
            Some(turn) => Ok(turn.content.clone()),
            None => Ok(NOT_ON_ADVENTURE.to_string()),
        }
    }

    async fn start_adventure(
        &self,
        user: &ChatUser,
        message: &UserMessage,
        now: DateTime<Utc>,
    ) -> Result<String, QuestlineError> {
        // Rate gate first, then the chain check.
        let window = self.store.rate_limit_window(&user.id, now).await?;
        let charged = match limiter::check(&window, self.limits.hourly_message_limit, now) {
            RateDecision::Allowed { charged } => charged,
            RateDecision::Refused { reply } => return Ok(reply),
        };

        if self.store.current_chain(&user.id).await?.is_some() {
            return Ok(ON_ADVENTURE.to_string());
        }

        let seed = self
            .adventure
            .seeds
            .choose(&mut rand::thread_rng())
            .ok_or_else(|| QuestlineError::Config("adventure.seeds is empty".into()))?;

        let seed_context = vec![ChatTurn::new(Role::System, self.adventure.system_prompt.clone())];
        let completion = self
            .backend
            .complete(&seed_context, &seed.text, self.adventure.seed_temperature)
            .await?;
        let Completion::Reply(reply) = completion else {
            // No chain and no charge when the seed call comes up empty.
            warn!(user_id = %user.id, "seed generation unavailable");
            return Ok(BUSY_REPLY.to_string());
        };

        let seed_response = format!("{} {}", seed.prefix, reply);
        let chain = Chain {
            id: Uuid::new_v4().to_string(),
            user_id: user.id.clone(),
            system_prompt: self.adventure.system_prompt.clone(),
            seed_prompt: seed.text.clone(),
            seed_response: seed_response.clone(),
            started_at: format_rfc3339(now),
            finished_at: None,
        };
        match self.store.create_chain(&chain).await {
            Ok(()) => {}
            Err(QuestlineError::ChainActive { .. }) => return Ok(ON_ADVENTURE.to_string()),
            Err(e) => return Err(e),
        }
        self.store.charge_user_message(&message.id).await?;

        Ok(format!(
            "{seed_response} ({}/{})",
            charged + 1,
            self.limits.hourly_message_limit
        ))
    }

    async fn handle_adventure_turn(
        &self,
        user: &ChatUser,
        message: &UserMessage,
        now: DateTime<Utc>,
    ) -> Result<String, QuestlineError> {
        let Some(chain) = self.store.current_chain(&user.id).await? else {
            return Ok(NOT_ON_ADVENTURE.to_string());
        };

        let window = self.store.rate_limit_window(&user.id, now).await?;
        let charged = match limiter::check(&window, self.limits.hourly_message_limit, now) {
            RateDecision::Allowed { charged } => charged,
            RateDecision::Refused { reply } => return Ok(reply),
        };

        let context = truncate(self.store.context(&chain).await?);

        // Charge before the generation calls; a failed call still counts.
        self.store.charge_user_message(&message.id).await?;

        let action = &message.content;
        let (reply_text, kind) = match self.check_action_validity(&context, action).await? {
            Some(rejection) => (rejection, TurnKind::Invalid),
            None => (
                self.narrate_action(&context, action).await?,
                TurnKind::Valid,
            ),
        };

        let ai_message = AiMessage {
            id: Uuid::new_v4().to_string(),
            content: reply_text.clone(),
            created_at: format_rfc3339(now),
        };
        self.store.insert_ai_message(&ai_message).await?;
        self.store
            .record_turn(&chain.id, &message.id, &ai_message.id, kind)
            .await?;

        Ok(format!(
            "<@{}> {} ({}/{})",
            user.external_id,
            reply_text,
            charged + 1,
            self.limits.hourly_message_limit
        ))
    }

    /// Run the validity check. A reply carrying the rejection marker is
    /// trimmed to start at the marker and returned; anything else, the
    /// busy fallback included, means the action stands.
    async fn check_action_validity(
        &self,
        context: &[ChatTurn],
        action: &str,
    ) -> Result<Option<String>, QuestlineError> {
        let prompt = self.adventure.validation_prompt.replace("{action}", action);
        let completion = self
            .backend
            .complete(context, &prompt, self.adventure.validation_temperature)
            .await?;
        let Completion::Reply(reply) = completion else {
            return Ok(None);
        };
        Ok(reply
            .find(REJECTION_MARKER)
            .map(|start| reply[start..].to_string()))
    }

    /// Run the narrative continuation. A reply that falls out of character
    /// into a generic assistant disclaimer gets one in-character failure
    /// re-prompt; backend busyness degrades to the fixed busy text.
    async fn narrate_action(
        &self,
        context: &[ChatTurn],
        action: &str,
    ) -> Result<String, QuestlineError> {
        let prompt = self.adventure.narrative_prompt.replace("{action}", action);
        let completion = self
            .backend
            .complete(context, &prompt, self.adventure.narrative_temperature)
            .await?;
        let reply = match completion {
            Completion::Reply(reply) => reply,
            Completion::Busy => return Ok(BUSY_REPLY.to_string()),
        };
        if !reply.contains(REFUSAL_MARKER) {
            return Ok(reply);
        }

        debug!("narrative reply fell out of character, re-prompting");
        let mut failure_context = context.to_vec();
        failure_context.push(ChatTurn::new(Role::User, prompt));
        let failure_prompt = self.adventure.failure_prompt.replace("{action}", action);
        let completion = self
            .backend
            .complete(
                &failure_context,
                &failure_prompt,
                self.adventure.narrative_temperature,
            )
            .await?;
        match completion {
            Completion::Reply(reply) => Ok(reply),
            Completion::Busy => Ok(BUSY_REPLY.to_string()),
        }
    }
}
