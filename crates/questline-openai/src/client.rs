// SPDX-FileCopyrightText: 2026 Questline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the OpenAI chat-completions API.
//!
//! One attempt is: POST the request, read the body text whatever the HTTP
//! status was, and classify the body. The API reports generation failures
//! inside the body's `error` object, so classification never looks at the
//! status code.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};
use tracing::debug;

use questline_core::QuestlineError;

use crate::types::{ChatCompletionRequest, ChatCompletionResponse};

/// Base URL for the OpenAI chat-completions API.
const API_BASE_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Classification of one generation attempt's response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// The body carried a completion.
    Success(String),
    /// `error.type == "server_error"`: worth trying again.
    Retryable(String),
    /// Any other error type, or a body with neither choices nor error.
    Fatal(String),
}

/// HTTP client for OpenAI API communication.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: reqwest::Client,
    base_url: String,
}

impl OpenAiClient {
    /// Creates a new OpenAI API client with bearer authentication.
    pub fn new(api_key: &str) -> Result<Self, QuestlineError> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {api_key}")).map_err(|e| {
            QuestlineError::Config(format!("invalid API key header value: {e}"))
        })?;
        auth.set_sensitive(true);
        headers.insert("authorization", auth);
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| QuestlineError::Backend {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: API_BASE_URL.to_string(),
        })
    }

    /// Overrides the base URL (for testing with wiremock).
    #[cfg(test)]
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url;
        self
    }

    /// Sends one request and returns the raw response body.
    ///
    /// Only transport failures are errors here; an HTTP error status still
    /// yields its body for classification and audit logging.
    pub async fn send(&self, request: &ChatCompletionRequest) -> Result<String, QuestlineError> {
        let response = self
            .client
            .post(&self.base_url)
            .json(request)
            .send()
            .await
            .map_err(|e| QuestlineError::Backend {
                message: format!("HTTP request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| QuestlineError::Backend {
            message: format!("failed to read response body: {e}"),
            source: Some(Box::new(e)),
        })?;
        debug!(status = %status, bytes = body.len(), "completion response received");
        Ok(body)
    }
}

/// Classify a raw response body into an attempt outcome.
pub fn classify(body: &str) -> AttemptOutcome {
    let response: ChatCompletionResponse = match serde_json::from_str(body) {
        Ok(response) => response,
        Err(e) => return AttemptOutcome::Fatal(format!("unparseable response body: {e}")),
    };
    if let Some(error) = response.error {
        if error.type_ == "server_error" {
            return AttemptOutcome::Retryable(error.message);
        }
        return AttemptOutcome::Fatal(format!("{}: {}", error.type_, error.message));
    }
    match response.choices.into_iter().next() {
        Some(choice) => AttemptOutcome::Success(choice.message.content),
        None => AttemptOutcome::Fatal("response carried no choices".into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use questline_core::types::{ChatTurn, Role};
    use wiremock::matchers::{body_json_string, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_request() -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: "gpt-3.5-turbo".into(),
            messages: vec![ChatTurn::new(Role::User, "look around")],
            temperature: 0.7,
        }
    }

    #[test]
    fn classify_success_extracts_first_choice() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"A river."}}]}"#;
        assert_eq!(classify(body), AttemptOutcome::Success("A river.".into()));
    }

    #[test]
    fn classify_server_error_is_retryable() {
        let body = r#"{"error":{"type":"server_error","message":"overloaded"}}"#;
        assert_eq!(classify(body), AttemptOutcome::Retryable("overloaded".into()));
    }

    #[test]
    fn classify_other_error_types_are_fatal() {
        let body = r#"{"error":{"type":"invalid_request_error","message":"bad model"}}"#;
        assert!(matches!(classify(body), AttemptOutcome::Fatal(_)));
    }

    #[test]
    fn classify_unparseable_body_is_fatal() {
        assert!(matches!(classify("<html>502</html>"), AttemptOutcome::Fatal(_)));
    }

    #[test]
    fn classify_empty_choices_is_fatal() {
        assert!(matches!(classify(r#"{"choices":[]}"#), AttemptOutcome::Fatal(_)));
    }

    #[tokio::test]
    async fn send_returns_body_on_success() {
        let server = MockServer::start().await;
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"ok"}}]}"#;
        Mock::given(method("POST"))
            .and(path("/"))
            .and(header("authorization", "Bearer test-key"))
            .and(header("content-type", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&server)
            .await;

        let client = OpenAiClient::new("test-key")
            .unwrap()
            .with_base_url(server.uri());
        let received = client.send(&test_request()).await.unwrap();
        assert_eq!(received, body);
    }

    #[tokio::test]
    async fn send_returns_body_even_on_http_error_status() {
        let server = MockServer::start().await;
        let body = r#"{"error":{"type":"server_error","message":"overloaded"}}"#;
        Mock::given(method("POST"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(500).set_body_string(body))
            .mount(&server)
            .await;

        let client = OpenAiClient::new("test-key")
            .unwrap()
            .with_base_url(server.uri());
        let received = client.send(&test_request()).await.unwrap();
        assert_eq!(classify(&received), AttemptOutcome::Retryable("overloaded".into()));
    }

    #[tokio::test]
    async fn send_posts_the_serialized_request() {
        let server = MockServer::start().await;
        let expected = serde_json::to_string(&test_request()).unwrap();
        Mock::given(method("POST"))
            .and(path("/"))
            .and(body_json_string(&expected))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .expect(1)
            .mount(&server)
            .await;

        let client = OpenAiClient::new("test-key")
            .unwrap()
            .with_base_url(server.uri());
        client.send(&test_request()).await.unwrap();
    }
}
