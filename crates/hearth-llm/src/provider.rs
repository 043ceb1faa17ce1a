//! Reasoning provider abstraction.
//!
//! Every call is a single stateless request/response with a fixed
//! instruction template. Callers always treat the provider as fallible and
//! wrap each call with a default-on-error fallback (see
//! [`crate::fallback::fallible`]); a provider failure never becomes a crash.

use async_trait::async_trait;
use thiserror::Error;

/// Result type alias for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Errors that can occur during provider operations.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Provider returned an API error.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error description.
        message: String,
    },

    /// The response carried no usable content.
    #[error("empty response from provider")]
    Empty,
}

/// An LLM backend answering one instruction at a time.
#[async_trait]
pub trait ReasoningProvider: Send + Sync {
    /// Complete `user_text` under `system_prompt`, returning the raw text.
    async fn complete(&self, system_prompt: &str, user_text: &str) -> ProviderResult<String>;
}
