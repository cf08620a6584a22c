//! Conversation data model
//!
//! Turns, citations and the per-page display state the UI renders from.

mod citation;
mod expansion;
mod session_id;
mod turn;

pub use citation::{group_by_page, Citation, CitationGroup};
pub use expansion::{ExpansionKey, ExpansionTracker};
pub use session_id::SessionId;
pub use turn::{Conversation, Turn};
