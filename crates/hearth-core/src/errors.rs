//! Boundary errors for structured model output.

use thiserror::Error;

/// Errors from parsing reasoning-provider output into commands.
///
/// A `ParseError` never crashes a request — the synthesizer maps it to
/// "no commands" and the orchestrator reports `success = false`.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The output was not valid JSON at all.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The JSON parsed but was neither a command object nor an array of them.
    #[error("expected a command object or an array of command objects")]
    UnexpectedShape,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_variants() {
        let err = ParseError::UnexpectedShape;
        assert_eq!(
            err.to_string(),
            "expected a command object or an array of command objects"
        );

        let json_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err = ParseError::from(json_err);
        assert!(err.to_string().starts_with("invalid JSON:"));
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ParseError>();
    }
}
