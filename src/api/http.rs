//! reqwest-backed implementation of the [`Backend`] boundary.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use tracing::debug;

use crate::api::{Backend, BackendError, ChatReply, ChatRequest, CredentialsRequest, LoginResponse};
use crate::core::language::Language;
use crate::core::mood::{validate_series, MoodPoint};
use crate::utils::url::{endpoint_url, normalize_server_url};

pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: normalize_server_url(base_url),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn post(&self, endpoint: &str) -> RequestBuilder {
        self.client
            .post(endpoint_url(&self.base_url, endpoint))
            .header("Content-Type", "application/json")
    }

    fn get(&self, endpoint: &str) -> RequestBuilder {
        self.client.get(endpoint_url(&self.base_url, endpoint))
    }
}

fn bearer(request: RequestBuilder, token: &str) -> RequestBuilder {
    request.header("Authorization", format!("Bearer {token}"))
}

/// Turn a non-success response into a [`BackendError`] built from its body.
async fn check_status(response: Response) -> Result<Response, BackendError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(BackendError::from_response(status, &body))
}

#[async_trait]
impl Backend for HttpBackend {
    async fn login(&self, username: &str, password: &str) -> Result<String, BackendError> {
        debug!(username, "login request");
        let response = self
            .post("login")
            .json(&CredentialsRequest {
                username: username.to_string(),
                password: password.to_string(),
            })
            .send()
            .await?;
        let response = check_status(response).await?;
        let parsed: LoginResponse = response.json().await?;
        if parsed.access_token.is_empty() {
            return Err(BackendError::new("login response contained no token"));
        }
        Ok(parsed.access_token)
    }

    async fn register(&self, username: &str, password: &str) -> Result<(), BackendError> {
        debug!(username, "register request");
        let response = self
            .post("register")
            .json(&CredentialsRequest {
                username: username.to_string(),
                password: password.to_string(),
            })
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    async fn send_chat(
        &self,
        token: &str,
        message: &str,
        language: Language,
    ) -> Result<ChatReply, BackendError> {
        debug!(language = %language, "chat request");
        let response = bearer(self.post("chat"), token)
            .json(&ChatRequest {
                message: message.to_string(),
                language,
            })
            .send()
            .await?;
        let response = check_status(response).await?;
        let reply: ChatReply = response.json().await?;
        Ok(reply)
    }

    async fn fetch_mood_trend(&self, token: &str) -> Result<Vec<MoodPoint>, BackendError> {
        debug!("mood trend request");
        let response = bearer(self.get("mood_trend"), token).send().await?;
        let response = check_status(response).await?;
        let points: Vec<MoodPoint> = response
            .json()
            .await
            .map_err(|err| BackendError::new(format!("malformed mood trend payload: {err}")))?;
        validate_series(&points).map_err(BackendError::new)?;
        Ok(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_is_normalized_on_construction() {
        let backend = HttpBackend::new("http://127.0.0.1:5000///");
        assert_eq!(backend.base_url(), "http://127.0.0.1:5000");
    }
}
