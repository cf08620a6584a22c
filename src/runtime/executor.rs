//! Chat runtime executor

use super::session::{AnswerJob, ChatSession, ChatSnapshot};
use super::Command;
use crate::answer::AnswerService;
use crate::state_machine::{Event, TransitionError};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};

/// Single-task owner of a chat session.
///
/// Commands are processed one at a time. Answer requests run as background
/// tasks and report back through the same queue, so the session is never
/// touched concurrently.
pub struct ChatRuntime<A>
where
    A: AnswerService + 'static,
{
    session: ChatSession,
    answer_service: Arc<A>,
    command_rx: mpsc::Receiver<Command>,
    /// Weak so the loop ends once every handle is dropped
    command_tx: mpsc::WeakSender<Command>,
    snapshot_tx: watch::Sender<ChatSnapshot>,
}

impl<A> ChatRuntime<A>
where
    A: AnswerService + 'static,
{
    pub(crate) fn new(
        session: ChatSession,
        answer_service: A,
        command_rx: mpsc::Receiver<Command>,
        command_tx: &mpsc::Sender<Command>,
        snapshot_tx: watch::Sender<ChatSnapshot>,
    ) -> Self {
        Self {
            session,
            answer_service: Arc::new(answer_service),
            command_rx,
            command_tx: command_tx.downgrade(),
            snapshot_tx,
        }
    }

    pub async fn run(mut self) {
        tracing::info!(
            session_id = %self.session.session_id(),
            endpoint = %self.answer_service.endpoint(),
            "Starting chat runtime"
        );
        self.publish();

        while let Some(command) = self.command_rx.recv().await {
            self.process_event(command.event);
            let snapshot = self.publish();
            if let Some(reply) = command.reply {
                let _ = reply.send(snapshot);
            }
        }

        tracing::info!(session_id = %self.session.session_id(), "Chat runtime stopped");
    }

    fn process_event(&mut self, event: Event) {
        let name = event.name();
        match self.session.handle(event) {
            Ok(Some(job)) => self.spawn_request(job),
            Ok(None) => {}
            Err(TransitionError::StaleSettlement { generation }) => {
                tracing::debug!(
                    generation,
                    current = self.session.state().generation(),
                    "Discarding answer for a reset conversation"
                );
            }
            Err(e) => {
                tracing::debug!(event = name, state = self.session.state().name(), error = %e, "Event rejected");
            }
        }
    }

    fn spawn_request(&self, job: AnswerJob) {
        let Some(command_tx) = self.command_tx.upgrade() else {
            return;
        };
        let service = self.answer_service.clone();

        tokio::spawn(async move {
            tracing::debug!(
                session_id = %job.request.session_id,
                generation = job.generation,
                "Requesting answer (background)"
            );

            let event = match service.ask(&job.request).await {
                Ok(answer) => Event::AnswerReceived {
                    generation: job.generation,
                    answer,
                },
                Err(error) => {
                    tracing::debug!(
                        kind = error.kind.as_str(),
                        generation = job.generation,
                        "Answer request failed, using fallback"
                    );
                    Event::AnswerFailed {
                        generation: job.generation,
                        error,
                    }
                }
            };

            if command_tx.send(Command::notify(event)).await.is_err() {
                tracing::debug!("Runtime gone before answer settled");
            }
        });
    }

    fn publish(&self) -> ChatSnapshot {
        let snapshot = self.session.snapshot();
        self.snapshot_tx.send_replace(snapshot.clone());
        snapshot
    }
}
