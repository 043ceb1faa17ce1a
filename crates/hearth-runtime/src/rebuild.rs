//! Full index rebuild from the live entity registry.

use std::sync::Arc;

use async_trait::async_trait;
use hearth_core::Document;
use hearth_embeddings::{
    EmbeddingProvider, EmbeddingStore, IndexError, IndexRebuilder, IndexSnapshot,
};
use hearth_platform::{EntitySource, document_for_entity, exposed_only, filter_primary_entities};
use hearth_settings::VocabularySettings;
use tracing::info;

/// Rebuild the retrieval index from scratch.
///
/// Pipeline: list entities → keep exposed → drop excluded domains → build
/// documents → embed and persist. Any failure aborts the whole rebuild and
/// leaves the previously persisted pair untouched.
pub async fn rebuild_index(
    source: &dyn EntitySource,
    store: &EmbeddingStore,
    embedder: &dyn EmbeddingProvider,
    vocab: &VocabularySettings,
    batch_size: usize,
) -> Result<Arc<IndexSnapshot>, IndexError> {
    let entities = source
        .list_entities()
        .await
        .map_err(|e| IndexError::Internal(format!("entity source: {e}")))?;
    let total = entities.len();

    let primary = filter_primary_entities(&exposed_only(entities), vocab);
    info!(total, indexed = primary.len(), "filtered entities for indexing");

    let documents: Vec<Document> = primary.iter().map(document_for_entity).collect();
    store.rebuild(documents, embedder, batch_size).await
}

/// [`IndexRebuilder`] wiring for the retriever's rebuild-and-retry hook.
pub struct StoreRebuilder {
    source: Arc<dyn EntitySource>,
    store: Arc<EmbeddingStore>,
    embedder: Arc<dyn EmbeddingProvider>,
    vocab: VocabularySettings,
    batch_size: usize,
}

impl StoreRebuilder {
    /// Create the hook.
    pub fn new(
        source: Arc<dyn EntitySource>,
        store: Arc<EmbeddingStore>,
        embedder: Arc<dyn EmbeddingProvider>,
        vocab: VocabularySettings,
        batch_size: usize,
    ) -> Self {
        Self {
            source,
            store,
            embedder,
            vocab,
            batch_size,
        }
    }
}

#[async_trait]
impl IndexRebuilder for StoreRebuilder {
    async fn rebuild(&self) -> Result<Arc<IndexSnapshot>, IndexError> {
        rebuild_index(
            self.source.as_ref(),
            &self.store,
            self.embedder.as_ref(),
            &self.vocab,
            self.batch_size,
        )
        .await
    }
}
