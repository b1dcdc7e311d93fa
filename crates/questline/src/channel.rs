// SPDX-FileCopyrightText: 2026 Questline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Console channel adapter used by the interactive shell.
//!
//! Replies leave the controller as [`OutboundMessage`]s and reach the
//! terminal through the same [`ChannelAdapter`] seam a chat transport
//! would use.

use async_trait::async_trait;

use questline_core::types::OutboundMessage;
use questline_core::{AdapterType, ChannelAdapter, HealthStatus, PluginAdapter, QuestlineError};

/// Channel that writes replies to standard output.
pub struct ConsoleChannel;

#[async_trait]
impl PluginAdapter for ConsoleChannel {
    fn name(&self) -> &str {
        "console"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Channel
    }

    async fn health_check(&self) -> Result<HealthStatus, QuestlineError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), QuestlineError> {
        Ok(())
    }
}

#[async_trait]
impl ChannelAdapter for ConsoleChannel {
    async fn send(&self, outbound: OutboundMessage) -> Result<(), QuestlineError> {
        println!("{}\n", outbound.text);
        Ok(())
    }
}
