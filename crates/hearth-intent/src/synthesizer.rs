//! Command synthesis and the small helper calls around it.
//!
//! The synthesizer never crashes on provider trouble: the helper calls
//! carry per-operation fallbacks, and command generation distinguishes a
//! provider failure (degrades to no commands) from genuinely malformed
//! model output (a [`ParseError`] the orchestrator reports as failure).

use std::sync::Arc;

use hearth_core::{Command, ParseError, parse_commands};
use hearth_llm::{ReasoningProvider, fallible};
use tracing::debug;

use crate::prompts;

/// Builds structured commands (and their confirmation prompt) from free text.
pub struct CommandSynthesizer {
    /// Provider for the cheap helper calls.
    helper: Arc<dyn ReasoningProvider>,
    /// Provider for command generation.
    command: Arc<dyn ReasoningProvider>,
    timeout_ms: u64,
}

impl CommandSynthesizer {
    /// Create a synthesizer. `helper` answers the small template calls,
    /// `command` generates the command JSON (typically a stronger model).
    pub fn new(
        helper: Arc<dyn ReasoningProvider>,
        command: Arc<dyn ReasoningProvider>,
        timeout_ms: u64,
    ) -> Self {
        Self {
            helper,
            command,
            timeout_ms,
        }
    }

    /// Reduce the utterance to retrieval keywords. Falls back to the
    /// original text.
    pub async fn refine_query(&self, text: &str) -> String {
        let refined = fallible(
            "refine_query",
            self.timeout_ms,
            text.to_string(),
            self.helper.complete(prompts::REFINE_QUERY, text),
        )
        .await;
        let refined = refined.trim().to_lowercase();
        if refined.is_empty() {
            text.to_string()
        } else {
            refined
        }
    }

    /// Whether the utterance implies music playback. Falls back to `false`,
    /// and any answer other than a literal `true` counts as `false`.
    pub async fn wants_music(&self, text: &str) -> bool {
        let answer = fallible(
            "wants_music",
            self.timeout_ms,
            "false".to_string(),
            self.helper.complete(prompts::WANTS_MUSIC, text),
        )
        .await;
        answer.trim().eq_ignore_ascii_case("true")
    }

    /// Generate a music search query. Falls back to the raw utterance.
    pub async fn music_query(&self, text: &str) -> String {
        let query = fallible(
            "music_query",
            self.timeout_ms,
            text.to_string(),
            self.helper.complete(prompts::MUSIC_QUERY, text),
        )
        .await;
        let query = query.trim();
        if query.is_empty() {
            text.to_string()
        } else {
            query.to_string()
        }
    }

    /// Generate the command list for `text` given the assembled device
    /// context.
    ///
    /// A provider failure degrades to an empty list; output that parses as
    /// neither a command object nor an array of them is a [`ParseError`].
    pub async fn generate_commands(
        &self,
        text: &str,
        context: &str,
    ) -> Result<Vec<Command>, ParseError> {
        let system = prompts::command_generation(context);
        let raw = fallible(
            "generate_commands",
            self.timeout_ms,
            "[]".to_string(),
            self.command.complete(&system, text),
        )
        .await;

        let commands = parse_commands(&raw)?;
        debug!(count = commands.len(), "synthesized commands");
        Ok(commands)
    }

    /// Generate the human confirmation prompt for pending commands.
    ///
    /// Falls back to a deterministic local summary so the user is always
    /// asked something, even with the provider down.
    pub async fn confirmation_message(&self, text: &str, commands: &[Command]) -> String {
        let summary = serde_json::to_string(commands).unwrap_or_default();
        let user = format!("Request: {text}\nCommands: {summary}");
        let message = fallible(
            "confirmation_message",
            self.timeout_ms,
            local_confirmation(commands),
            self.helper.complete(prompts::CONFIRMATION, &user),
        )
        .await;
        if message.trim().is_empty() {
            local_confirmation(commands)
        } else {
            message
        }
    }
}

/// Deterministic confirmation text used when the provider is unavailable.
fn local_confirmation(commands: &[Command]) -> String {
    let services: Vec<String> = commands
        .iter()
        .map(|c| format!("{} for {}", c.service, c.target_label()))
        .collect();
    format!(
        "I'm ready to run {} command(s): {}. Shall I go ahead?",
        commands.len(),
        services.join(", ")
    )
}
