//! Effects produced by state transitions

use super::DispatchContext;
use crate::answer::Answer;
use crate::conversation::{ExpansionKey, Turn};

/// Effects to be applied after a state transition
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Append a turn to the conversation
    AppendTurn { turn: Turn },

    /// Replace the input buffer
    SetDraft { text: String },

    /// Call the answering service (spawns as background task)
    RequestAnswer { query: String, generation: u64 },

    /// Flip one citation group
    ToggleExpansion { key: ExpansionKey },

    /// Drop all turns, expansion flags and the draft in one step
    ClearConversation,

    /// Replace the session identifier
    RotateSession,
}

impl Effect {
    pub fn append_user(text: impl Into<String>) -> Self {
        Effect::AppendTurn {
            turn: Turn::user(text),
        }
    }

    pub fn append_answer(answer: Answer) -> Self {
        Effect::AppendTurn {
            turn: Turn::assistant(answer.text, answer.citations),
        }
    }

    pub fn append_fallback(context: &DispatchContext) -> Self {
        Effect::AppendTurn {
            turn: Turn::assistant(context.fallback_message.clone(), vec![]),
        }
    }

    pub fn clear_draft() -> Self {
        Effect::SetDraft {
            text: String::new(),
        }
    }
}
