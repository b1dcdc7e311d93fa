// SPDX-FileCopyrightText: 2026 Questline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Timestamp formatting shared across the workspace.
//!
//! Every persisted timestamp is an RFC 3339 string in UTC with millisecond
//! precision. The fixed width keeps lexicographic order identical to
//! chronological order, which the storage layer relies on for range scans.

use chrono::{DateTime, SecondsFormat, Utc};

/// Formats an instant as a canonical RFC 3339 string.
pub fn format_rfc3339(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// The current time as a canonical RFC 3339 string.
pub fn now_rfc3339() -> String {
    format_rfc3339(Utc::now())
}
