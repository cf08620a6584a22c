//! Chat session state and effect application
//!
//! Owns everything the dispatcher mutates. All mutation goes through
//! [`ChatSession::handle`], which runs the pure transition and then applies
//! its effects in order, so no partially applied event is ever observable.

use crate::answer::AnswerRequest;
use crate::conversation::{
    group_by_page, Citation, Conversation, ExpansionTracker, SessionId, Turn,
};
use crate::state_machine::{
    transition, DispatchContext, DispatchState, Effect, Event, TransitionError,
};
use serde::Serialize;

/// A query the runtime must send to the answering service
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerJob {
    pub request: AnswerRequest,
    pub generation: u64,
}

pub struct ChatSession {
    context: DispatchContext,
    state: DispatchState,
    conversation: Conversation,
    expansion: ExpansionTracker,
    session_id: SessionId,
    draft: String,
}

impl ChatSession {
    pub fn new(context: DispatchContext) -> Self {
        Self::with_session_id(context, SessionId::generate())
    }

    pub fn with_session_id(context: DispatchContext, session_id: SessionId) -> Self {
        Self {
            context,
            state: DispatchState::default(),
            conversation: Conversation::new(),
            expansion: ExpansionTracker::new(),
            session_id,
            draft: String::new(),
        }
    }

    /// Apply one event.
    ///
    /// Returns the answer request to dispatch when a query was accepted.
    /// On error nothing has changed.
    pub fn handle(&mut self, event: Event) -> Result<Option<AnswerJob>, TransitionError> {
        let event = match event {
            Event::SubmitDraft => Event::Submit {
                text: self.draft.clone(),
            },
            other => other,
        };

        let result = transition(&self.state, &self.context, event)?;
        self.state = result.new_state;

        let mut job = None;
        for effect in result.effects {
            if let Some(next) = self.apply_effect(effect) {
                job = Some(next);
            }
        }
        Ok(job)
    }

    fn apply_effect(&mut self, effect: Effect) -> Option<AnswerJob> {
        match effect {
            Effect::AppendTurn { turn } => {
                self.conversation.push(turn);
                None
            }
            Effect::SetDraft { text } => {
                self.draft = text;
                None
            }
            Effect::RequestAnswer { query, generation } => Some(AnswerJob {
                request: AnswerRequest::new(query, self.session_id.clone()),
                generation,
            }),
            Effect::ToggleExpansion { key } => {
                self.expansion.toggle(key.turn_index, key.page);
                None
            }
            Effect::ClearConversation => {
                self.conversation.clear();
                self.expansion.clear();
                self.draft.clear();
                None
            }
            Effect::RotateSession => {
                self.session_id = SessionId::generate();
                None
            }
        }
    }

    pub fn state(&self) -> DispatchState {
        self.state
    }

    pub fn is_pending(&self) -> bool {
        self.state.is_pending()
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn expansion(&self) -> &ExpansionTracker {
        &self.expansion
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn snapshot(&self) -> ChatSnapshot {
        ChatSnapshot {
            session_id: self.session_id.clone(),
            state: self.state,
            turns: self.conversation.turns().to_vec(),
            expansion: self.expansion.clone(),
            draft: self.draft.clone(),
        }
    }
}

/// Read-only copy of a session for rendering
#[derive(Debug, Clone)]
pub struct ChatSnapshot {
    pub session_id: SessionId,
    pub state: DispatchState,
    pub turns: Vec<Turn>,
    pub expansion: ExpansionTracker,
    pub draft: String,
}

/// One citation group as the UI shows it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CitationGroupView {
    pub page: u32,
    pub count: usize,
    pub expanded: bool,
    pub citations: Vec<Citation>,
}

impl ChatSnapshot {
    /// Whether a query is in flight (drives the loading indicator)
    pub fn pending(&self) -> bool {
        self.state.is_pending()
    }

    pub fn is_expanded(&self, turn_index: usize, page: u32) -> bool {
        self.expansion.is_expanded(turn_index, page)
    }

    /// Grouped citations of a turn with their expansion flags.
    ///
    /// Empty for user turns and out-of-range indices.
    pub fn citation_view(&self, turn_index: usize) -> Vec<CitationGroupView> {
        let Some(turn) = self.turns.get(turn_index) else {
            return vec![];
        };
        group_by_page(turn.citations())
            .into_iter()
            .map(|group| CitationGroupView {
                page: group.page,
                count: group.len(),
                expanded: self.is_expanded(turn_index, group.page),
                citations: group.citations,
            })
            .collect()
    }
}
