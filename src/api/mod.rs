//! Wire payloads and the backend service boundary.
//!
//! Every remote collaborator sits behind the [`Backend`] trait: the auth
//! endpoints, the chat/sentiment endpoint, and the mood-trend aggregation
//! endpoint. Production uses [`http::HttpBackend`]; tests substitute canned
//! implementations.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;

use crate::core::language::Language;
use crate::core::message::Sentiment;
use crate::core::mood::MoodPoint;

pub mod http;

#[derive(Serialize)]
pub struct CredentialsRequest {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
}

#[derive(Serialize)]
pub struct ChatRequest {
    pub message: String,
    pub language: Language,
}

/// Reply from the chat endpoint. Sentiment metadata is tolerated as absent
/// or unrecognized; an odd label degrades to an untagged bot message rather
/// than poisoning the transcript.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatReply {
    pub response: String,
    #[serde(default)]
    pub sentiment: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
}

impl ChatReply {
    pub fn parsed_sentiment(&self) -> Option<Sentiment> {
        self.sentiment.as_deref().and_then(Sentiment::parse)
    }
}

/// Failure talking to a remote service, flattened to a displayable summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendError {
    message: String,
}

impl BackendError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Condense an error response body into a one-line summary. JSON bodies
    /// with an `error` or `message` field yield that field; anything else
    /// falls back to the HTTP status.
    pub fn from_response(status: reqwest::StatusCode, body: &str) -> Self {
        if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
            if let Some(summary) = extract_error_summary(&value) {
                return Self::new(summary);
            }
        }
        Self::new(format!("request failed with status {status}"))
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl Error for BackendError {}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        // Strip the URL reqwest embeds; the status line is what the user
        // needs on a one-line status display.
        Self::new(err.without_url().to_string())
    }
}

fn extract_error_summary(value: &serde_json::Value) -> Option<String> {
    let summary = value
        .pointer("/error/message")
        .and_then(|v| v.as_str())
        .map(str::to_owned)
        .or_else(|| {
            value.get("error").and_then(|v| match v {
                serde_json::Value::String(s) => Some(s.to_string()),
                serde_json::Value::Object(map) => map
                    .get("message")
                    .and_then(|message| message.as_str().map(str::to_owned)),
                _ => None,
            })
        })
        .or_else(|| {
            value
                .get("message")
                .and_then(|v| v.as_str().map(str::to_owned))
        })?;

    let collapsed = summary.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        None
    } else {
        Some(collapsed)
    }
}

/// The remote service boundary. All calls are stateless request/response;
/// authenticated calls take the bearer token explicitly.
#[async_trait]
pub trait Backend: Send + Sync {
    /// POST /login. Success yields the access token.
    async fn login(&self, username: &str, password: &str) -> Result<String, BackendError>;

    /// POST /register. Registration never authenticates; success is status
    /// only.
    async fn register(&self, username: &str, password: &str) -> Result<(), BackendError>;

    /// POST /chat with a bearer token.
    async fn send_chat(
        &self,
        token: &str,
        message: &str,
        language: Language,
    ) -> Result<ChatReply, BackendError>;

    /// GET /mood_trend with a bearer token. The returned series is
    /// time-ordered by the server.
    async fn fetch_mood_trend(&self, token: &str) -> Result<Vec<MoodPoint>, BackendError>;
}
