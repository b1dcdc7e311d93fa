// SPDX-FileCopyrightText: 2026 Questline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The closed command set and its help listing.

/// Command table: name and help description, in listing order.
pub const COMMANDS: [(&str, &str); 3] = [
    ("!repeat", "last adventure message."),
    ("!start", "a new adventure."),
    ("!help", "to view commands."),
];

/// One parsed `!`-prefixed message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Repeat,
    Start,
    Help,
    /// Anything `!`-prefixed that is not in the table, original text kept
    /// for the error reply.
    Unknown(String),
}

impl Command {
    /// Parse a full message. Matching is case-insensitive and exact: a
    /// command with trailing text is not a command.
    pub fn parse(content: &str) -> Self {
        match content.to_lowercase().as_str() {
            "!repeat" => Command::Repeat,
            "!start" => Command::Start,
            "!help" => Command::Help,
            _ => Command::Unknown(content.to_string()),
        }
    }
}

/// The `!help` listing, one line per table entry.
pub fn help_text() -> String {
    COMMANDS
        .iter()
        .map(|(name, desc)| format!("\n{name} {desc}"))
        .collect::<Vec<_>>()
        .join(" ")
}
