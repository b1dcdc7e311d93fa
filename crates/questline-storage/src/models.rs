// SPDX-FileCopyrightText: 2026 Questline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain model types for storage entities.
//!
//! The canonical types are defined in `questline-core::types` for use across
//! adapter trait boundaries. This module re-exports them for convenience
//! within the storage crate.

pub use questline_core::types::{
    AiMessage, Chain, ChatTurn, ChatUser, RateWindow, TurnKind, UserMessage,
};
