//! Query dispatch state machine
//!
//! Implements the Elm Architecture pattern with pure state transitions:
//! `transition` decides, the runtime applies the resulting effects.

mod effect;
pub mod event;
pub mod state;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;

pub use effect::Effect;
pub use event::Event;
pub use state::{DispatchContext, DispatchState, SessionPolicy, DEFAULT_FALLBACK_MESSAGE};
pub use transition::{transition, TransitionError, TransitionResult};
