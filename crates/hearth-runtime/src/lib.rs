//! # hearth-runtime
//!
//! Request orchestration: one utterance in, one [`Reply`] out.
//!
//! Per utterance the orchestrator sweeps expired sessions, short-circuits
//! into the confirmation flow when one is open, classifies intent, and for
//! control requests runs the full refine → retrieve → rerank → synthesize
//! pipeline before opening a session. Every external call is caught at its
//! own step and degraded to a local fallback — the caller always gets a
//! reply, never an error.
//!
//! [`Reply`]: hearth_core::Reply

#![deny(unsafe_code)]

pub mod context;
pub mod orchestrator;
pub mod rebuild;

pub use context::build_context;
pub use orchestrator::{Orchestrator, OrchestratorDeps};
pub use rebuild::{StoreRebuilder, rebuild_index};
