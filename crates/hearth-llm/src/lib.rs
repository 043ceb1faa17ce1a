//! # hearth-llm
//!
//! Reasoning provider trait and OpenAI-compatible HTTP clients.
//!
//! Defines the [`ReasoningProvider`] trait every LLM backend implements
//! (one stateless `complete(system, user)` round-trip per call), the
//! matching embeddings client for the retrieval index, and [`fallible`] —
//! the uniform bounded-timeout + typed-fallback wrapper applied at every
//! external call site.

#![deny(unsafe_code)]

pub mod embeddings;
pub mod fallback;
pub mod openai;
pub mod provider;

pub use embeddings::OpenAiEmbeddings;
pub use fallback::fallible;
pub use openai::{OpenAiChat, OpenAiConfig};
pub use provider::{ProviderError, ProviderResult, ReasoningProvider};
