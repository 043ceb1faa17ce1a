//! The per-utterance orchestrator.

use std::sync::Arc;
use std::time::Duration;

use hearth_core::{Document, Intent, Reply};
use hearth_embeddings::{EmbeddingProvider, EmbeddingStore, SimilarityRetriever};
use hearth_history::{HistoryEntry, HistoryLog};
use hearth_intent::{CommandSynthesizer, IntentClassifier};
use hearth_llm::fallible;
use hearth_music::MusicSearch;
use hearth_platform::{EntitySource, rerank};
use hearth_session::{ConfirmationFlow, Session, SessionStore};
use hearth_settings::HearthSettings;
use tracing::{debug, info, warn};

use crate::context::build_context;
use crate::rebuild::rebuild_index;

/// Everything the orchestrator talks to, injected for testability.
pub struct OrchestratorDeps {
    /// The host platform's entity registry.
    pub entities: Arc<dyn EntitySource>,
    /// Query-side retrieval.
    pub retriever: Arc<SimilarityRetriever>,
    /// Index persistence (for background rebuilds).
    pub store: Arc<EmbeddingStore>,
    /// Embedding provider (for background rebuilds).
    pub embedder: Arc<dyn EmbeddingProvider>,
    /// Intent classification.
    pub classifier: IntentClassifier,
    /// Command synthesis and helper calls.
    pub synthesizer: CommandSynthesizer,
    /// Music search, if configured.
    pub music: Option<Arc<dyn MusicSearch>>,
    /// Session storage.
    pub sessions: Arc<dyn SessionStore>,
    /// Confirmation handling.
    pub confirmation: ConfirmationFlow,
    /// Command history.
    pub history: Arc<HistoryLog>,
}

/// Sequences one utterance through the pipeline.
pub struct Orchestrator {
    deps: OrchestratorDeps,
    settings: HearthSettings,
}

impl Orchestrator {
    /// Create an orchestrator.
    pub fn new(deps: OrchestratorDeps, settings: HearthSettings) -> Self {
        Self { deps, settings }
    }

    /// Process one utterance for a conversation key.
    ///
    /// Always returns a [`Reply`]; every external failure has already been
    /// degraded to a fallback by the time it would reach the caller.
    pub async fn process(&self, text: &str, conversation_key: &str) -> Reply {
        info!(key = conversation_key, "processing utterance");

        // Housekeeping first: expired sessions go regardless of key.
        let timeout = Duration::from_secs(self.settings.session.timeout_secs);
        let evicted = self.deps.sessions.sweep(timeout);
        if evicted > 0 {
            debug!(evicted, "swept expired sessions");
        }

        // An open confirmation swallows the utterance entirely.
        if let Some(session) = self.deps.sessions.get(conversation_key) {
            debug!(key = conversation_key, "dispatching to open confirmation");
            return self
                .deps
                .confirmation
                .handle(
                    self.deps.sessions.as_ref(),
                    conversation_key,
                    &session,
                    text,
                )
                .await;
        }

        let intent = self.deps.classifier.classify(text).await;
        info!(%intent, "intent classified");

        match intent {
            Intent::Control => self.handle_control(text, conversation_key).await,
            Intent::Weather => Reply::ok("Weather not implemented"),
            Intent::Question => Reply::ok("Question not implemented"),
            Intent::RebuildDatabase => {
                self.spawn_rebuild();
                Reply::ok("Rebuilding the device index in the background...")
            }
            Intent::Test => Reply::ok("Test done"),
        }
    }

    async fn handle_control(&self, text: &str, key: &str) -> Reply {
        let synthesizer = &self.deps.synthesizer;

        // Separate refinement call: the retrieval query is not the user text.
        let refined = synthesizer.refine_query(text).await;
        let mut retrieval_query = refined;

        let mut music_uri: Option<String> = None;
        if synthesizer.wants_music(text).await {
            retrieval_query.push_str(", media_player, speaker");
            if let Some(music) = &self.deps.music {
                let query = synthesizer.music_query(text).await;
                music_uri = fallible(
                    "music_search",
                    self.settings.api.request_timeout_ms,
                    None,
                    music.search(&query),
                )
                .await;
                debug!(found = music_uri.is_some(), "music search complete");
            }
        }

        let scored = self
            .deps
            .retriever
            .query(&retrieval_query, self.settings.index.query_top_k)
            .await;
        let candidates: Vec<Document> = scored.into_iter().map(|s| s.document).collect();
        let final_docs = rerank(
            &retrieval_query,
            candidates,
            self.settings.index.rerank_keep,
            &self.settings.vocabulary,
        );
        debug!(candidates = final_docs.len(), "retrieval and rerank complete");

        let context = build_context(
            music_uri.as_deref(),
            &final_docs,
            self.settings.index.snippet_max_chars,
        );

        let commands = match synthesizer.generate_commands(text, &context).await {
            Ok(commands) => commands,
            Err(error) => {
                warn!(%error, "command generation output unusable");
                return Reply::none();
            }
        };
        if commands.is_empty() {
            debug!("no commands synthesized");
            return Reply::none();
        }

        let prompt = synthesizer.confirmation_message(text, &commands).await;
        self.deps
            .sessions
            .put(key, Session::new(commands.clone(), key));
        self.deps.history.append(
            HistoryEntry::new(text, key, prompt.clone(), None)
                .with_commands(&commands)
                .with_status("awaiting_confirmation"),
        );
        info!(key, commands = commands.len(), "session opened, awaiting confirmation");

        // Pending, not executed: success stays false until confirmation.
        Reply::pending(prompt)
    }

    /// Fire-and-forget background rebuild.
    fn spawn_rebuild(&self) {
        let source = Arc::clone(&self.deps.entities);
        let store = Arc::clone(&self.deps.store);
        let embedder = Arc::clone(&self.deps.embedder);
        let retriever = Arc::clone(&self.deps.retriever);
        let vocab = self.settings.vocabulary.clone();
        let batch_size = self.settings.index.embed_batch_size;

        let _ = tokio::spawn(async move {
            match rebuild_index(source.as_ref(), &store, embedder.as_ref(), &vocab, batch_size)
                .await
            {
                Ok(snapshot) => {
                    retriever.install(snapshot);
                    info!("background rebuild complete");
                }
                Err(error) => warn!(%error, "background rebuild failed"),
            }
        });
    }
}
