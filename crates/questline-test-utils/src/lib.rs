// SPDX-FileCopyrightText: 2026 Questline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Questline integration tests.
//!
//! Provides a deterministic [`MockBackend`] and a [`TestHarness`] that
//! wires it to a real temp-directory SQLite store and the turn controller.

pub mod harness;
pub mod mock_backend;

pub use harness::{TEST_USER_ID, TestHarness, TestHarnessBuilder};
pub use mock_backend::MockBackend;
