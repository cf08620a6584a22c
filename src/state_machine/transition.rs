//! Pure state transition function

use super::{DispatchContext, DispatchState, Effect, Event, SessionPolicy};
use crate::conversation::ExpansionKey;
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: DispatchState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: DispatchState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_effects(mut self, effects: impl IntoIterator<Item = Effect>) -> Self {
        self.effects.extend(effects);
        self
    }
}

/// Events the dispatcher refuses.
///
/// None of these reach the user: the runtime logs them and moves on, and the
/// state is left exactly as it was.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Query is empty")]
    EmptyQuery,
    #[error("A query is already in flight")]
    QueryInFlight,
    #[error("Discarding answer from generation {generation}")]
    StaleSettlement { generation: u64 },
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
}

/// Pure transition function
///
/// Given the same inputs it always produces the same outputs, with no I/O.
pub fn transition(
    state: &DispatchState,
    context: &DispatchContext,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    match (state, event) {
        // ============================================================
        // Query submission
        // ============================================================
        (_, Event::Submit { text }) if text.trim().is_empty() => Err(TransitionError::EmptyQuery),

        (DispatchState::Pending { .. }, Event::Submit { .. }) => {
            Err(TransitionError::QueryInFlight)
        }

        // Idle + Submit -> Pending
        (DispatchState::Idle { generation }, Event::Submit { text }) => {
            let generation = *generation;
            Ok(TransitionResult::new(DispatchState::Pending { generation })
                .with_effect(Effect::append_user(text.clone()))
                .with_effect(Effect::clear_draft())
                .with_effect(Effect::RequestAnswer {
                    query: text,
                    generation,
                }))
        }

        // The session swaps this for `Submit` with the buffer contents
        (_, Event::SubmitDraft) => Err(TransitionError::InvalidTransition(
            "SubmitDraft must be resolved before transition".to_string(),
        )),

        // ============================================================
        // Settlement
        // ============================================================

        // Pending + answer for this generation -> Idle
        (DispatchState::Pending { generation }, Event::AnswerReceived { generation: g, answer })
            if g == *generation =>
        {
            Ok(TransitionResult::new(DispatchState::Idle {
                generation: *generation,
            })
            .with_effect(Effect::append_answer(answer)))
        }

        // Pending + failure for this generation -> Idle with the fallback turn
        (DispatchState::Pending { generation }, Event::AnswerFailed { generation: g, .. })
            if g == *generation =>
        {
            Ok(TransitionResult::new(DispatchState::Idle {
                generation: *generation,
            })
            .with_effect(Effect::append_fallback(context)))
        }

        // Anything else settling belongs to a conversation that was reset
        (_, Event::AnswerReceived { generation, .. } | Event::AnswerFailed { generation, .. }) => {
            Err(TransitionError::StaleSettlement { generation })
        }

        // ============================================================
        // New conversation
        // ============================================================
        (state, Event::Reset) => {
            let next = DispatchState::Idle {
                generation: state.generation().wrapping_add(1),
            };
            let rotate = match context.session_policy {
                SessionPolicy::KeepOnReset => None,
                SessionPolicy::RotateOnReset => Some(Effect::RotateSession),
            };
            Ok(TransitionResult::new(next)
                .with_effect(Effect::ClearConversation)
                .with_effects(rotate))
        }

        // ============================================================
        // Display state, allowed in any state
        // ============================================================
        (state, Event::DraftChanged { text }) => {
            Ok(TransitionResult::new(*state).with_effect(Effect::SetDraft { text }))
        }

        (state, Event::ToggleCitations { turn_index, page }) => {
            Ok(TransitionResult::new(*state).with_effect(Effect::ToggleExpansion {
                key: ExpansionKey::new(turn_index, page),
            }))
        }
    }
}
