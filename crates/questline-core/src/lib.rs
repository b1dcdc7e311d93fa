// SPDX-FileCopyrightText: 2026 Questline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Questline adventure bot.
//!
//! This crate provides the foundational trait definitions, error types, and
//! common types used throughout the Questline workspace. The storage layer,
//! the generation backend, and the chat channel all plug in through traits
//! defined here.

pub mod error;
pub mod time;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::QuestlineError;
pub use types::{AdapterType, Completion, HealthStatus, Role};

pub use traits::{ChainStore, ChannelAdapter, GenerationBackend, PluginAdapter};
