// SPDX-FileCopyrightText: 2026 Questline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Channel adapter trait for chat transports.
//!
//! The gateway itself (message receipt, identity resolution, reconnects)
//! is an external collaborator; this trait only fixes the outbound side of
//! the boundary so the controller stays transport-agnostic.

use async_trait::async_trait;

use crate::error::QuestlineError;
use crate::traits::adapter::PluginAdapter;
use crate::types::OutboundMessage;

/// Adapter for sending replies back over a chat transport.
#[async_trait]
pub trait ChannelAdapter: PluginAdapter {
    async fn send(&self, outbound: OutboundMessage) -> Result<(), QuestlineError>;
}
