//! The orchestrator's answer to one utterance.

use serde::{Deserialize, Serialize};

/// User-facing response text plus an explicit success flag.
///
/// `success = false` covers both genuine failures and the pending state
/// (commands synthesized but awaiting confirmation). `text = None` only
/// occurs for unrecognized intents and parse failures — every other path
/// produces some textual response, even under total provider failure.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    /// Natural-language response for the user, if any.
    pub text: Option<String>,
    /// Whether the request fully succeeded.
    pub success: bool,
}

impl Reply {
    /// A successful reply with text.
    pub fn ok(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            success: true,
        }
    }

    /// A reply with text that does not (yet) represent success — pending
    /// confirmations and degraded answers.
    pub fn pending(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            success: false,
        }
    }

    /// No response text, not successful. Unrecognized intent / no command.
    pub fn none() -> Self {
        Self {
            text: None,
            success: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors() {
        assert_eq!(
            Reply::ok("Done."),
            Reply {
                text: Some("Done.".to_string()),
                success: true
            }
        );
        assert!(!Reply::pending("Shall I?").success);
        assert_eq!(Reply::none().text, None);
    }
}
