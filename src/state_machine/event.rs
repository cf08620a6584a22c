//! Events that can occur in a chat session

use crate::answer::{Answer, AnswerError};

/// Events that trigger state transitions
#[derive(Debug, Clone)]
pub enum Event {
    // User events
    Submit {
        text: String,
    },
    /// Submit whatever is in the input buffer.
    /// Resolved into `Submit` by the session before the transition runs.
    SubmitDraft,
    DraftChanged {
        text: String,
    },
    ToggleCitations {
        turn_index: usize,
        page: u32,
    },
    /// "New conversation"
    Reset,

    // Answering service events
    AnswerReceived {
        generation: u64,
        answer: Answer,
    },
    AnswerFailed {
        generation: u64,
        error: AnswerError,
    },
}

impl Event {
    pub fn submit(text: impl Into<String>) -> Self {
        Event::Submit { text: text.into() }
    }

    pub fn toggle(turn_index: usize, page: u32) -> Self {
        Event::ToggleCitations { turn_index, page }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Event::Submit { .. } => "submit",
            Event::SubmitDraft => "submit_draft",
            Event::DraftChanged { .. } => "draft_changed",
            Event::ToggleCitations { .. } => "toggle_citations",
            Event::Reset => "reset",
            Event::AnswerReceived { .. } => "answer_received",
            Event::AnswerFailed { .. } => "answer_failed",
        }
    }
}
