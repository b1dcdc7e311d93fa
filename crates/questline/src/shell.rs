// SPDX-FileCopyrightText: 2026 Questline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `questline shell` command implementation.
//!
//! Launches an interactive REPL over the real store, backend, and turn
//! controller. Input lines travel the same path as chat-transport
//! messages, so `!start`, `!repeat`, and freeform actions all work.

use std::sync::Arc;

use colored::Colorize;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::info;

use crate::channel::ConsoleChannel;
use questline_config::QuestlineConfig;
use questline_core::types::InboundMessage;
use questline_core::{ChainStore, ChannelAdapter, GenerationBackend, QuestlineError};
use questline_engine::TurnController;
use questline_openai::OpenAiBackend;
use questline_storage::SqliteChainStore;

/// External id used for the local shell user.
const SHELL_USER_ID: &str = "local";

/// Runs the `questline shell` interactive REPL.
pub async fn run_shell(config: QuestlineConfig) -> Result<(), QuestlineError> {
    let store = Arc::new(SqliteChainStore::new(config.storage.clone()));
    store.initialize().await?;
    let store: Arc<dyn ChainStore> = store;

    let backend = OpenAiBackend::new(&config.openai, store.clone()).inspect_err(|_| {
        eprintln!(
            "error: OpenAI API key required. Set openai.api_key in questline.toml \
             or the QUESTLINE_OPENAI_API_KEY env var."
        );
    })?;
    let backend: Arc<dyn GenerationBackend> = Arc::new(backend);

    let controller = TurnController::new(
        store.clone(),
        backend,
        config.limits.clone(),
        config.adventure.clone(),
    );
    let channel: Arc<dyn ChannelAdapter> = Arc::new(ConsoleChannel);
    info!(path = %config.storage.database_path, "shell session started");

    let mut rl = DefaultEditor::new()
        .map_err(|e| QuestlineError::Internal(format!("failed to initialize readline: {e}")))?;

    println!("{}", "questline shell".bold().green());
    println!("Type {} to begin, {} to exit.\n", "!start".yellow(), "/quit".yellow());

    let prompt = format!("{}> ", "questline".green());
    loop {
        match rl.readline(&prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed == "/quit" || trimmed == "/exit" {
                    break;
                }
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(&line);

                let inbound = InboundMessage {
                    sender_external_id: SHELL_USER_ID.to_string(),
                    sender_name: SHELL_USER_ID.to_string(),
                    content: trimmed.to_string(),
                };
                match controller.handle_message(&inbound, chrono::Utc::now()).await {
                    Ok(reply) => {
                        if let Err(e) = channel.send(reply).await {
                            eprintln!("{}: {e}", "error".red());
                        }
                    }
                    Err(e) => eprintln!("{}: {e}", "error".red()),
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                // Ctrl+C / Ctrl+D
                break;
            }
            Err(e) => {
                eprintln!("{}: {e}", "error".red());
                break;
            }
        }
    }

    channel.shutdown().await?;
    store.close().await?;
    println!("{}", "goodbye".dimmed());
    Ok(())
}
