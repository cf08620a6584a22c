//! Runtime for driving a chat session
//!
//! [`spawn`] starts a [`ChatRuntime`] on the current tokio runtime and returns
//! a [`ChatHandle`] through which a front end submits queries, toggles
//! citation groups and observes [`ChatSnapshot`]s.

mod executor;
mod session;


pub use executor::ChatRuntime;
pub use session::{AnswerJob, ChatSession, ChatSnapshot, CitationGroupView};

use crate::answer::AnswerService;
use crate::state_machine::{DispatchContext, Event};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot, watch};

const COMMAND_BUFFER: usize = 32;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RuntimeError {
    #[error("Chat runtime has stopped")]
    Closed,
}

/// Event plus an optional reply slot for the post-event snapshot
#[derive(Debug)]
pub(crate) struct Command {
    event: Event,
    reply: Option<oneshot::Sender<ChatSnapshot>>,
}

impl Command {
    fn notify(event: Event) -> Self {
        Self { event, reply: None }
    }
}

/// Start a runtime for a fresh session
pub fn spawn<A: AnswerService + 'static>(context: DispatchContext, service: A) -> ChatHandle {
    spawn_session(ChatSession::new(context), service)
}

/// Start a runtime for an existing session
pub fn spawn_session<A: AnswerService + 'static>(session: ChatSession, service: A) -> ChatHandle {
    let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
    let (snapshot_tx, snapshot_rx) = watch::channel(session.snapshot());

    let runtime = ChatRuntime::new(session, service, command_rx, &command_tx, snapshot_tx);
    tokio::spawn(runtime.run());

    ChatHandle {
        command_tx,
        snapshot_rx,
    }
}

/// Handle to interact with a running chat session
#[derive(Clone)]
pub struct ChatHandle {
    command_tx: mpsc::Sender<Command>,
    snapshot_rx: watch::Receiver<ChatSnapshot>,
}

impl ChatHandle {
    /// Send an event and wait until the runtime has applied it.
    ///
    /// The returned snapshot reflects the event; rejected events (blank query,
    /// query already in flight) leave it unchanged.
    pub async fn send(&self, event: Event) -> Result<ChatSnapshot, RuntimeError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.command_tx
            .send(Command {
                event,
                reply: Some(reply_tx),
            })
            .await
            .map_err(|_| RuntimeError::Closed)?;
        reply_rx.await.map_err(|_| RuntimeError::Closed)
    }

    pub async fn submit(&self, text: impl Into<String>) -> Result<ChatSnapshot, RuntimeError> {
        self.send(Event::submit(text)).await
    }

    pub async fn submit_draft(&self) -> Result<ChatSnapshot, RuntimeError> {
        self.send(Event::SubmitDraft).await
    }

    pub async fn set_draft(&self, text: impl Into<String>) -> Result<ChatSnapshot, RuntimeError> {
        self.send(Event::DraftChanged { text: text.into() }).await
    }

    pub async fn toggle_citations(
        &self,
        turn_index: usize,
        page: u32,
    ) -> Result<ChatSnapshot, RuntimeError> {
        self.send(Event::toggle(turn_index, page)).await
    }

    /// Start a new conversation; an in-flight answer will be discarded
    pub async fn reset(&self) -> Result<ChatSnapshot, RuntimeError> {
        self.send(Event::Reset).await
    }

    /// Latest published snapshot
    pub fn snapshot(&self) -> ChatSnapshot {
        self.snapshot_rx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ChatSnapshot> {
        self.snapshot_rx.clone()
    }

    /// Wait until no query is in flight
    pub async fn wait_until_idle(&self) -> Result<ChatSnapshot, RuntimeError> {
        let mut rx = self.snapshot_rx.clone();
        let snapshot = rx
            .wait_for(|s| !s.pending())
            .await
            .map_err(|_| RuntimeError::Closed)?;
        Ok(snapshot.clone())
    }
}
