//! Conversation turns and the append-only store

use super::citation::{group_by_page, Citation, CitationGroup};
use serde::{Deserialize, Serialize};

/// One exchange unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Turn {
    /// Query as typed by the user (non-empty after trimming)
    User { text: String },
    /// Answer from the backend, or the fallback apology
    Assistant {
        answer: String,
        #[serde(default)]
        citations: Vec<Citation>,
    },
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Turn::User { text: text.into() }
    }

    pub fn assistant(answer: impl Into<String>, citations: Vec<Citation>) -> Self {
        Turn::Assistant {
            answer: answer.into(),
            citations,
        }
    }

    pub fn is_user(&self) -> bool {
        matches!(self, Turn::User { .. })
    }

    pub fn is_assistant(&self) -> bool {
        matches!(self, Turn::Assistant { .. })
    }

    /// Query or answer text
    pub fn text(&self) -> &str {
        match self {
            Turn::User { text } => text,
            Turn::Assistant { answer, .. } => answer,
        }
    }

    /// Citations of an assistant turn; empty for user turns
    pub fn citations(&self) -> &[Citation] {
        match self {
            Turn::User { .. } => &[],
            Turn::Assistant { citations, .. } => citations,
        }
    }

    pub fn citation_groups(&self) -> Vec<CitationGroup> {
        group_by_page(self.citations())
    }
}

/// Ordered turns of the current conversation.
///
/// Append-only; the only removal is a full clear.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Conversation {
    turns: Vec<Turn>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a turn and return its index
    pub fn push(&mut self, turn: Turn) -> usize {
        self.turns.push(turn);
        self.turns.len() - 1
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn get(&self, index: usize) -> Option<&Turn> {
        self.turns.get(index)
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }
}
