// SPDX-FileCopyrightText: 2026 Questline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions.

pub mod adapter;
pub mod channel;
pub mod generation;
pub mod store;

pub use adapter::PluginAdapter;
pub use channel::ChannelAdapter;
pub use generation::GenerationBackend;
pub use store::ChainStore;
