// SPDX-FileCopyrightText: 2026 Questline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sliding one-hour rate limit over the stored message window.

use chrono::{DateTime, Duration, Utc};

use questline_core::types::RateWindow;

/// Outcome of a rate-limit check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RateDecision {
    /// Under the limit; `charged` is the window total before this turn.
    Allowed { charged: i64 },
    /// At or over the limit; `reply` is the user-facing refusal.
    Refused { reply: String },
}

/// Check a window aggregate against the hourly limit.
///
/// The wait time in a refusal is the time until the oldest windowed
/// message ages out, rounded to whole minutes and floored at zero. An
/// empty window is always allowed.
pub fn check(window: &RateWindow, limit: i64, now: DateTime<Utc>) -> RateDecision {
    if window.charged < limit {
        return RateDecision::Allowed {
            charged: window.charged,
        };
    }
    let minutes = window
        .oldest
        .as_deref()
        .and_then(|oldest| DateTime::parse_from_rfc3339(oldest).ok())
        .map(|oldest| {
            let reset = oldest.with_timezone(&Utc) + Duration::hours(1) - now;
            (reset.num_seconds() as f64 / 60.0).round().max(0.0) as i64
        })
        .unwrap_or(0);
    RateDecision::Refused {
        reply: format!(
            "You've reached your limit of {limit} messages per hour. \
             Try again in {minutes} minutes."
        ),
    }
}
