// SPDX-FileCopyrightText: 2026 Questline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query modules for typed operations on storage entities.

pub mod chains;
pub mod generation_log;
pub mod messages;
pub mod turns;
pub mod users;
