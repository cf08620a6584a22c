//! Analyst Assistant - chat client core for a document question-answering backend
//!
//! Holds the conversation, dispatches one query at a time to the backend's
//! `POST /chat` endpoint, and groups each answer's citations by source page.
//! The front end drives it through [`runtime::ChatHandle`] and renders the
//! published [`runtime::ChatSnapshot`]s.

pub mod answer;
pub mod config;
pub mod conversation;
pub mod runtime;
pub mod state_machine;
