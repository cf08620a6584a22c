//! Request/response types for the answering backend

use super::AnswerError;
use crate::conversation::{Citation, SessionId};
use serde::{Deserialize, Serialize};

/// Body of `POST /chat`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnswerRequest {
    pub query: String,
    pub session_id: SessionId,
}

impl AnswerRequest {
    pub fn new(query: impl Into<String>, session_id: SessionId) -> Self {
        Self {
            query: query.into(),
            session_id,
        }
    }
}

/// Successful response body as sent by the backend
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    pub answer: String,
    /// Absent, null and empty are all accepted
    #[serde(default)]
    pub sources: Option<Vec<SourceRecord>>,
}

/// One supporting source on the wire
#[derive(Debug, Clone, Deserialize)]
pub struct SourceRecord {
    /// Some backends omit the score; it reads as 0.0
    #[serde(default)]
    pub score: f64,
    pub text: String,
    pub page: i64,
}

impl TryFrom<SourceRecord> for Citation {
    type Error = AnswerError;

    /// Pages are 1-based. A backend reporting 0-based loader pages must
    /// shift them; page 0 fails the whole answer rather than mislabel it.
    fn try_from(source: SourceRecord) -> Result<Self, Self::Error> {
        let page = u32::try_from(source.page)
            .ok()
            .filter(|p| *p >= 1)
            .ok_or_else(|| AnswerError::malformed(format!("Invalid source page: {}", source.page)))?;
        Ok(Citation::new(source.score, source.text, page))
    }
}

/// Answer with its citations, validated
#[derive(Debug, Clone, PartialEq)]
pub struct Answer {
    pub text: String,
    pub citations: Vec<Citation>,
}

impl Answer {
    pub fn new(text: impl Into<String>, citations: Vec<Citation>) -> Self {
        Self {
            text: text.into(),
            citations,
        }
    }
}

impl TryFrom<ChatResponse> for Answer {
    type Error = AnswerError;

    fn try_from(resp: ChatResponse) -> Result<Self, Self::Error> {
        let citations = resp
            .sources
            .unwrap_or_default()
            .into_iter()
            .map(Citation::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Answer::new(resp.answer, citations))
    }
}
