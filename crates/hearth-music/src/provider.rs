//! Music search abstraction.

use async_trait::async_trait;
use thiserror::Error;

/// Errors from the music provider.
#[derive(Debug, Error)]
pub enum MusicError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Token acquisition failed.
    #[error("auth error ({status}): {message}")]
    Auth {
        /// HTTP status code.
        status: u16,
        /// Error description.
        message: String,
    },

    /// The search endpoint returned an error.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error description.
        message: String,
    },
}

/// Resolves a free-form music query to a playable URI.
#[async_trait]
pub trait MusicSearch: Send + Sync {
    /// Search for `query`, returning the best match's URI if any.
    async fn search(&self, query: &str) -> Result<Option<String>, MusicError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        assert_eq!(
            MusicError::Auth {
                status: 401,
                message: "bad credentials".to_string()
            }
            .to_string(),
            "auth error (401): bad credentials"
        );
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MusicError>();
    }
}
