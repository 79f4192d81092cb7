use super::models::{ChatRequest, ChatResponse};
use crate::error::ChatError;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use std::time::Duration;

/// Anything that can answer a user query.
#[async_trait]
pub trait ChatService: Send + Sync {
    async fn send_query(&self, user_id: &str, query: &str) -> Result<String, ChatError>;
}

fn transport_error(e: reqwest::Error) -> ChatError {
    if e.is_timeout() {
        ChatError::Timeout
    } else {
        ChatError::Network(e)
    }
}

/// HTTP client for the assistant's `/chat` endpoint.
pub struct ChatClient {
    client: reqwest::Client,
    endpoint: String,
}

impl ChatClient {
    pub fn new(endpoint: impl Into<String>, timeout_secs: u64) -> Result<Self, ChatError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl ChatService for ChatClient {
    async fn send_query(&self, user_id: &str, query: &str) -> Result<String, ChatError> {
        tracing::debug!(endpoint = %self.endpoint, user_id, "sending chat query");

        let response = self
            .client
            .post(&self.endpoint)
            .json(&ChatRequest { user_id, query })
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ChatError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.bytes().await.map_err(transport_error)?;
        let parsed: ChatResponse =
            serde_json::from_slice(&body).map_err(|e| ChatError::Decode(e.to_string()))?;

        tracing::debug!(chars = parsed.response.len(), "chat reply received");
        Ok(parsed.response)
    }
}
