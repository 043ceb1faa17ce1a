//! Intent classification.

use std::sync::Arc;

use hearth_core::Intent;
use hearth_llm::{ReasoningProvider, fallible};
use tracing::debug;

use crate::prompts;

/// Classifies utterances into the closed intent set.
pub struct IntentClassifier {
    provider: Arc<dyn ReasoningProvider>,
    timeout_ms: u64,
}

impl IntentClassifier {
    /// Create a classifier over the given provider.
    pub fn new(provider: Arc<dyn ReasoningProvider>, timeout_ms: u64) -> Self {
        Self {
            provider,
            timeout_ms,
        }
    }

    /// Classify `text`.
    ///
    /// The provider's answer is validated against the closed set; an
    /// unrecognized answer, provider failure, or timeout all degrade to
    /// [`Intent::Test`].
    pub async fn classify(&self, text: &str) -> Intent {
        let answer = fallible(
            "classify_intent",
            self.timeout_ms,
            String::new(),
            self.provider.complete(prompts::CLASSIFY, text),
        )
        .await;

        let intent = Intent::parse(&answer).unwrap_or(Intent::Test);
        debug!(%intent, "classified utterance");
        intent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthesizer::test_support::ScriptedProvider;

    #[tokio::test]
    async fn classify_valid_answer() {
        let provider = Arc::new(ScriptedProvider::replying(&["control"]));
        let classifier = IntentClassifier::new(provider, 1000);
        assert_eq!(classifier.classify("turn on the lights").await, Intent::Control);
    }

    #[tokio::test]
    async fn classify_weather() {
        let provider = Arc::new(ScriptedProvider::replying(&["weather"]));
        let classifier = IntentClassifier::new(provider, 1000);
        assert_eq!(classifier.classify("what's the weather").await, Intent::Weather);
    }

    #[tokio::test]
    async fn classify_tolerates_case() {
        let provider = Arc::new(ScriptedProvider::replying(&["  Rebuild_Database "]));
        let classifier = IntentClassifier::new(provider, 1000);
        assert_eq!(
            classifier.classify("refresh your devices").await,
            Intent::RebuildDatabase
        );
    }

    #[tokio::test]
    async fn unrecognized_answer_defaults_to_test() {
        let provider = Arc::new(ScriptedProvider::replying(&["music please"]));
        let classifier = IntentClassifier::new(provider, 1000);
        assert_eq!(classifier.classify("play a song").await, Intent::Test);
    }

    #[tokio::test]
    async fn provider_failure_defaults_to_test() {
        let provider = Arc::new(ScriptedProvider::failing());
        let classifier = IntentClassifier::new(provider, 1000);
        assert_eq!(classifier.classify("turn on the lights").await, Intent::Test);
    }
}
