//! HTTP client for the answering backend

use super::types::{Answer, AnswerRequest, ChatResponse};
use super::{AnswerError, AnswerService};
use crate::config::ChatConfig;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Talks to the backend's `POST /chat` and `GET /health` endpoints
pub struct HttpAnswerService {
    client: Client,
    chat_url: String,
    health_url: String,
}

impl HttpAnswerService {
    pub fn new(api_base: &str, timeout: Duration) -> Result<Self, AnswerError> {
        let base = api_base.trim_end_matches('/');
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AnswerError::unknown(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            chat_url: format!("{base}/chat"),
            health_url: format!("{base}/health"),
        })
    }

    pub fn from_config(config: &ChatConfig) -> Result<Self, AnswerError> {
        Self::new(&config.api_base, config.request_timeout)
    }

    /// Probe `GET /health`; any 2xx counts as healthy
    pub async fn health(&self) -> Result<(), AnswerError> {
        let response = self
            .client
            .get(&self.health_url)
            .send()
            .await
            .map_err(|e| classify_transport_error(&e))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(AnswerError::status(
                status.as_u16(),
                format!("Health check failed: {status}"),
            ))
        }
    }
}

#[async_trait]
impl AnswerService for HttpAnswerService {
    async fn ask(&self, request: &AnswerRequest) -> Result<Answer, AnswerError> {
        let response = self
            .client
            .post(&self.chat_url)
            .json(request)
            .send()
            .await
            .map_err(|e| classify_transport_error(&e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AnswerError::network(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            return Err(AnswerError::status(
                status.as_u16(),
                format!("Server error: {} - {body}", status.as_u16()),
            ));
        }

        let parsed: ChatResponse = serde_json::from_str(&body)
            .map_err(|e| AnswerError::malformed(format!("Failed to parse response: {e}")))?;
        Answer::try_from(parsed)
    }

    fn endpoint(&self) -> &str {
        &self.chat_url
    }
}

fn classify_transport_error(e: &reqwest::Error) -> AnswerError {
    if e.is_timeout() {
        AnswerError::timeout(format!("Request timeout: {e}"))
    } else if e.is_connect() {
        AnswerError::network(format!("Connection failed: {e}"))
    } else {
        AnswerError::unknown(format!("Request failed: {e}"))
    }
}
