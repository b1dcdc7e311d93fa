// SPDX-FileCopyrightText: 2026 Questline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Serde types for the OpenAI chat-completions wire format.

use serde::{Deserialize, Serialize};

use questline_core::types::ChatTurn;

/// Request body for `POST /v1/chat/completions`.
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatTurn>,
    pub temperature: f64,
}

/// Response body. The API returns either `choices` or `error`; both are
/// optional here so one type covers every body shape the server sends,
/// whatever the HTTP status was.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub error: Option<ApiError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChoiceMessage {
    pub content: String,
}

/// Error object embedded in failure bodies.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    #[serde(rename = "type")]
    pub type_: String,
    #[serde(default)]
    pub message: String,
}
