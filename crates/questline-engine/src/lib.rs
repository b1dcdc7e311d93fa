// SPDX-FileCopyrightText: 2026 Questline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Turn controller and command dispatch for the Questline adventure bot.
//!
//! The [`TurnController`] takes one inbound message and produces one
//! reply, orchestrating the chain store and the generation backend. The
//! supporting modules are pure: command parsing, rate-limit arithmetic,
//! and context truncation have no I/O of their own.

pub mod commands;
pub mod context;
pub mod limiter;
pub mod turn;

pub use commands::Command;
pub use limiter::RateDecision;
pub use turn::TurnController;
