//! Dispatch state types

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Assistant text appended when a query fails for any reason
pub const DEFAULT_FALLBACK_MESSAGE: &str =
    "Hubo un error al conectar con el backend. Asegúrate de que el servidor esté corriendo.";

/// Dispatcher state.
///
/// `generation` identifies the current conversation and increases on every
/// reset. A pending query remembers the generation it was submitted in, so
/// an answer that arrives after a reset can be recognised and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DispatchState {
    /// Ready for a query
    Idle { generation: u64 },
    /// One query in flight
    Pending { generation: u64 },
}

impl Default for DispatchState {
    fn default() -> Self {
        DispatchState::Idle { generation: 0 }
    }
}

impl DispatchState {
    pub fn generation(&self) -> u64 {
        match self {
            DispatchState::Idle { generation } | DispatchState::Pending { generation } => {
                *generation
            }
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, DispatchState::Pending { .. })
    }

    pub fn name(&self) -> &'static str {
        match self {
            DispatchState::Idle { .. } => "idle",
            DispatchState::Pending { .. } => "pending",
        }
    }
}

/// What happens to the session identifier on "new conversation"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPolicy {
    /// Keep one identifier for the whole process lifetime
    #[default]
    KeepOnReset,
    /// Start a fresh backend-side context on every reset
    RotateOnReset,
}

impl FromStr for SessionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "keep" => Ok(SessionPolicy::KeepOnReset),
            "rotate" => Ok(SessionPolicy::RotateOnReset),
            other => Err(format!("unknown session policy: {other}")),
        }
    }
}

/// Immutable configuration consulted by transitions
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchContext {
    pub session_policy: SessionPolicy,
    pub fallback_message: String,
}

impl DispatchContext {
    pub fn new(session_policy: SessionPolicy, fallback_message: impl Into<String>) -> Self {
        Self {
            session_policy,
            fallback_message: fallback_message.into(),
        }
    }
}

impl Default for DispatchContext {
    fn default() -> Self {
        Self::new(SessionPolicy::default(), DEFAULT_FALLBACK_MESSAGE)
    }
}
