//! The confirmation state machine.
//!
//! `AwaitingConfirmation → {Executed | Canceled}`, with anything
//! unrecognized re-prompting and leaving the session untouched. Execution
//! is best-effort and ordered: one failing command never stops the rest,
//! and the aggregate message tells the user exactly which commands failed
//! (up to two named, then a count).

use std::sync::Arc;
use std::time::Duration;

use hearth_core::{Command, Reply};
use hearth_history::{HistoryEntry, HistoryLog};
use hearth_platform::CommandExecutor;
use tracing::{info, warn};

use crate::store::{Session, SessionStore};

/// Handles the user's response to a pending confirmation.
pub struct ConfirmationFlow {
    executor: Arc<dyn CommandExecutor>,
    history: Arc<HistoryLog>,
    confirm_words: Vec<String>,
    cancel_words: Vec<String>,
    timeout_ms: u64,
}

impl ConfirmationFlow {
    /// Create a flow executing through `executor` and recording to `history`.
    pub fn new(
        executor: Arc<dyn CommandExecutor>,
        history: Arc<HistoryLog>,
        confirm_words: Vec<String>,
        cancel_words: Vec<String>,
        timeout_ms: u64,
    ) -> Self {
        Self {
            executor,
            history,
            confirm_words,
            cancel_words,
            timeout_ms,
        }
    }

    /// Process `user_text` against the open session for `key`.
    ///
    /// The caller has already established that a session exists and is
    /// awaiting confirmation; classification and retrieval are skipped
    /// entirely while one is open.
    pub async fn handle(
        &self,
        store: &dyn SessionStore,
        key: &str,
        session: &Session,
        user_text: &str,
    ) -> Reply {
        let lowered = user_text.trim().to_lowercase();

        if self.confirm_words.iter().any(|w| w.to_lowercase() == lowered) {
            return self.execute(store, key, session, user_text).await;
        }

        if self.cancel_words.iter().any(|w| w.to_lowercase() == lowered) {
            info!(key, "canceling pending session");
            store.delete(key);
            self.history.append(
                HistoryEntry::new(user_text, key, "Request canceled.", None)
                    .with_commands(&session.commands)
                    .with_status("canceled"),
            );
            return Reply::ok("Request canceled.");
        }

        // Unrecognized response: re-prompt, session stays live.
        Reply::pending("Please say yes or no.")
    }

    async fn execute(
        &self,
        store: &dyn SessionStore,
        key: &str,
        session: &Session,
        user_text: &str,
    ) -> Reply {
        let mut failed: Vec<String> = Vec::new();

        for command in &session.commands {
            if !self.execute_one(command).await {
                failed.push(format!("{} for {}", command.service, command.target_label()));
            }
        }

        info!(
            key,
            total = session.commands.len(),
            failed = failed.len(),
            "executed pending session"
        );
        store.delete(key);

        let success = failed.is_empty();
        let response = result_message(session.commands.len(), &failed);
        self.history.append(
            HistoryEntry::new(user_text, key, response.clone(), Some(success))
                .with_commands(&session.commands)
                .with_status("executed"),
        );

        Reply {
            text: Some(response),
            success,
        }
    }

    async fn execute_one(&self, command: &Command) -> bool {
        let call = self.executor.execute(command);
        match tokio::time::timeout(Duration::from_millis(self.timeout_ms), call).await {
            Ok(Ok(())) => true,
            Ok(Err(error)) => {
                warn!(%error, service = %command.service, "command failed");
                false
            }
            Err(_) => {
                warn!(service = %command.service, "command timed out");
                false
            }
        }
    }
}

/// The user-facing aggregate result message.
fn result_message(total: usize, failed: &[String]) -> String {
    if failed.is_empty() {
        return "Done.".to_string();
    }
    if failed.len() == total {
        return "Sorry, I couldn't complete any of the requested actions.".to_string();
    }
    let mut message = format!(
        "Completed some actions, but had trouble with: {}",
        failed[..failed.len().min(2)].join(", ")
    );
    if failed.len() > 2 {
        message.push_str(&format!(" and {} more", failed.len() - 2));
    }
    message
}
