//! HTTP client for the chat endpoint.
//!
//! The endpoint is an external collaborator: it takes `{"prompt": ...}` and
//! answers with `{"response": ...}`, using the status line to signal failure.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{ChatError, Result};

/// Default endpoint path, resolved against the base URL like a page-relative fetch.
pub const DEFAULT_ENDPOINT: &str = "/chat";

/// Request body sent to the chat endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Trimmed user input.
    pub prompt: String,
}

/// Success body returned by the chat endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    /// Agent reply. Absent or `null` when the server had nothing to say.
    #[serde(default)]
    pub response: Option<String>,
}

impl ChatReply {
    /// Reply text, or `None` when the field is absent or empty.
    pub fn text(&self) -> Option<&str> {
        self.response.as_deref().filter(|s| !s.is_empty())
    }
}

/// Something that can carry one prompt to the chat endpoint and back.
///
/// The widget only depends on this trait, so hosts and tests can swap the
/// transport without touching rendering.
#[async_trait]
pub trait ChatClient: Send + Sync + fmt::Debug {
    /// Send a prompt and wait for the reply.
    async fn send(&self, prompt: &str) -> Result<ChatReply>;
}

/// [`ChatClient`] backed by `reqwest`.
///
/// # Example
///
/// ```rust,no_run
/// use chat_widget::client::{ChatClient, HttpChatClient};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = HttpChatClient::new("http://localhost:8000", "/chat")?;
/// let reply = client.send("Hello!").await?;
/// println!("{:?}", reply.text());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpChatClient {
    endpoint: Url,
    http: reqwest::Client,
}

impl HttpChatClient {
    /// Create a client posting to `endpoint` resolved against `base_url`.
    pub fn new(base_url: impl AsRef<str>, endpoint: impl AsRef<str>) -> Result<Self> {
        Self::with_client(base_url, endpoint, reqwest::Client::new())
    }

    /// Create a client with a custom reqwest client.
    pub fn with_client(
        base_url: impl AsRef<str>,
        endpoint: impl AsRef<str>,
        http: reqwest::Client,
    ) -> Result<Self> {
        let endpoint = Url::parse(base_url.as_ref())?.join(endpoint.as_ref())?;
        Ok(Self { endpoint, http })
    }

    /// Create a client whose requests give up after `timeout`.
    ///
    /// Without this the transport's own default applies.
    pub fn with_timeout(
        base_url: impl AsRef<str>,
        endpoint: impl AsRef<str>,
        timeout: Duration,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ChatError::Transport)?;
        Self::with_client(base_url, endpoint, http)
    }

    /// Fully resolved endpoint URL.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl ChatClient for HttpChatClient {
    async fn send(&self, prompt: &str) -> Result<ChatReply> {
        let req = ChatRequest {
            prompt: prompt.to_string(),
        };
        // `.json()` sets `Content-Type: application/json`.
        let response = self
            .http
            .post(self.endpoint.clone())
            .json(&req)
            .send()
            .await
            .map_err(ChatError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ChatError::Status {
                status: status.as_u16(),
            });
        }
        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_is_resolved_against_origin() {
        let client = HttpChatClient::new("http://localhost:8000/app/", "/chat").unwrap();
        assert_eq!(client.endpoint().as_str(), "http://localhost:8000/chat");
    }

    #[test]
    fn relative_endpoint_keeps_base_path() {
        let client = HttpChatClient::new("http://localhost:8000/app/", "chat").unwrap();
        assert_eq!(client.endpoint().as_str(), "http://localhost:8000/app/chat");
    }

    #[test]
    fn bad_base_url_is_rejected() {
        let err = HttpChatClient::new("not a url", "/chat").unwrap_err();
        assert!(matches!(err, ChatError::InvalidUrl(_)));
    }

    #[test]
    fn reply_without_field_has_no_text() {
        let reply: ChatReply = serde_json::from_str("{}").unwrap();
        assert_eq!(reply.text(), None);

        let reply: ChatReply = serde_json::from_str(r#"{"response": ""}"#).unwrap();
        assert_eq!(reply.text(), None);

        let reply: ChatReply = serde_json::from_str(r#"{"response": "Hello"}"#).unwrap();
        assert_eq!(reply.text(), Some("Hello"));
    }

    #[test]
    fn request_body_shape() {
        let body = serde_json::to_value(ChatRequest {
            prompt: "hi".into(),
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({ "prompt": "hi" }));
    }
}
