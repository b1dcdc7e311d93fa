// SPDX-FileCopyrightText: 2026 Questline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Context window truncation.

use questline_core::types::ChatTurn;

/// Maximum trailing entries kept alongside the system prompt.
pub const CONTEXT_WINDOW: usize = 21;

/// Cap an assembled context at the window size: when it grows past
/// [`CONTEXT_WINDOW`] entries, keep the first entry (the system prompt)
/// plus the last [`CONTEXT_WINDOW`].
pub fn truncate(mut context: Vec<ChatTurn>) -> Vec<ChatTurn> {
    if context.len() <= CONTEXT_WINDOW {
        return context;
    }
    let first = context.remove(0);
    let tail = context.split_off(context.len() - CONTEXT_WINDOW);
    let mut out = Vec::with_capacity(CONTEXT_WINDOW + 1);
    out.push(first);
    out.extend(tail);
    out
}
