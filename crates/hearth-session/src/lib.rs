//! # hearth-session
//!
//! Per-conversation pending-command state.
//!
//! A session is born when a control request resolves to at least one
//! command, and dies exactly one of three ways: executed on an affirmative
//! response, discarded on a negative one, or evicted by the timeout sweep.
//! Anything else the user says while a session is open re-prompts without
//! touching it.

#![deny(unsafe_code)]

pub mod confirm;
pub mod store;

pub use confirm::ConfirmationFlow;
pub use store::{InMemorySessionStore, Session, SessionStatus, SessionStore};
