//! Answering service abstraction
//!
//! The remote question-answering backend is reached through [`AnswerService`],
//! so the runtime can run against the HTTP client or a mock.

mod error;
mod http;
mod types;

pub use error::{AnswerError, AnswerErrorKind};
pub use http::HttpAnswerService;
pub use types::{Answer, AnswerRequest, ChatResponse, SourceRecord};

use async_trait::async_trait;
use std::sync::Arc;

/// Common interface for answering backends
#[async_trait]
pub trait AnswerService: Send + Sync {
    /// Ask one question within a backend session
    async fn ask(&self, request: &AnswerRequest) -> Result<Answer, AnswerError>;

    /// Where requests go, for logging
    fn endpoint(&self) -> &str;
}

#[async_trait]
impl<T: AnswerService + ?Sized> AnswerService for Arc<T> {
    async fn ask(&self, request: &AnswerRequest) -> Result<Answer, AnswerError> {
        (**self).ask(request).await
    }

    fn endpoint(&self) -> &str {
        (**self).endpoint()
    }
}

/// Logging wrapper for answering services
pub struct LoggingService {
    inner: Arc<dyn AnswerService>,
    endpoint: String,
}

impl LoggingService {
    pub fn new(inner: Arc<dyn AnswerService>) -> Self {
        let endpoint = inner.endpoint().to_string();
        Self { inner, endpoint }
    }
}

#[async_trait]
impl AnswerService for LoggingService {
    async fn ask(&self, request: &AnswerRequest) -> Result<Answer, AnswerError> {
        let start = std::time::Instant::now();
        let result = self.inner.ask(request).await;
        let duration = start.elapsed();

        match &result {
            Ok(answer) => {
                tracing::info!(
                    endpoint = %self.endpoint,
                    session_id = %request.session_id,
                    duration_ms = %duration.as_millis(),
                    citations = answer.citations.len(),
                    "Answer request completed"
                );
            }
            Err(e) => {
                tracing::warn!(
                    endpoint = %self.endpoint,
                    session_id = %request.session_id,
                    duration_ms = %duration.as_millis(),
                    kind = ?e.kind,
                    status = ?e.status,
                    error = %e.message,
                    "Answer request failed"
                );
            }
        }

        result
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}
