//! # hearth-core
//!
//! Foundation types for the Hearth assistant.
//!
//! This crate provides the shared vocabulary that all other Hearth crates
//! depend on:
//!
//! - **Documents**: the retrieval-indexed text + metadata view of an entity
//! - **Commands**: `domain.action` service calls with a strict JSON schema
//! - **Intents**: the closed five-way utterance classification
//! - **Replies**: user-facing text + success flag returned by the orchestrator

#![deny(unsafe_code)]

pub mod command;
pub mod document;
pub mod errors;
pub mod intent;
pub mod reply;

pub use command::{Command, parse_commands};
pub use document::{Document, DocumentMetadata};
pub use errors::ParseError;
pub use intent::Intent;
pub use reply::Reply;
