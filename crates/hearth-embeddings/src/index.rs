//! Similarity index snapshot and query-time retrieval.
//!
//! An [`IndexSnapshot`] is an immutable matrix/document pair; rebuilds
//! produce a fresh snapshot which the retriever swaps in atomically, so a
//! query never observes mismatched rows and documents.

use std::sync::Arc;

use async_trait::async_trait;
use hearth_core::Document;
use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::errors::{IndexError, Result};
use crate::provider::EmbeddingProvider;
use crate::vector::{dot, l2_norm, unit_normalize};

/// A retrieval hit: document plus cosine similarity.
#[derive(Clone, Debug)]
pub struct ScoredDocument {
    /// The matched document.
    pub document: Document,
    /// Cosine similarity against the query (higher = more similar).
    pub score: f32,
}

/// Immutable matrix + aligned document list.
#[derive(Debug)]
pub struct IndexSnapshot {
    matrix: Vec<f32>,
    dim: usize,
    documents: Vec<Document>,
}

impl IndexSnapshot {
    /// Create a snapshot, verifying the row/document alignment invariant.
    pub fn new(matrix: Vec<f32>, dim: usize, documents: Vec<Document>) -> Result<Self> {
        if dim == 0 || matrix.len() != dim * documents.len() {
            return Err(IndexError::Misaligned {
                rows: if dim == 0 { 0 } else { matrix.len() / dim },
                documents: documents.len(),
            });
        }
        Ok(Self {
            matrix,
            dim,
            documents,
        })
    }

    /// Number of matrix rows (== number of documents).
    pub fn rows(&self) -> usize {
        self.documents.len()
    }

    /// Vector dimensionality.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// The indexed documents, in matrix row order.
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Raw row-major matrix data.
    pub fn matrix(&self) -> &[f32] {
        &self.matrix
    }

    /// Rank all documents against an already-embedded query.
    ///
    /// Query and rows are unit-normalized (zero-norm rows score 0), cosine
    /// is the dot product, and the sort is stable so ties keep original
    /// document order. Returns at most `k` results.
    pub fn search(&self, query: &[f32], k: usize) -> Vec<ScoredDocument> {
        let mut query = query.to_vec();
        unit_normalize(&mut query);

        let scores: Vec<f32> = (0..self.rows())
            .map(|row| {
                let slice = &self.matrix[row * self.dim..(row + 1) * self.dim];
                let norm = l2_norm(slice);
                if norm == 0.0 {
                    return 0.0;
                }
                dot(slice, &query) / norm
            })
            .collect();

        let mut order: Vec<usize> = (0..self.rows()).collect();
        order.sort_by(|a, b| {
            scores[*b]
                .partial_cmp(&scores[*a])
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        order.truncate(k);

        order
            .into_iter()
            .map(|idx| ScoredDocument {
                document: self.documents[idx].clone(),
                score: scores[idx],
            })
            .collect()
    }
}

/// Rebuilds the index from scratch, producing a fresh snapshot.
///
/// Implemented by the runtime (entity listing + filtering + store rebuild);
/// the retriever only uses it for the optional rebuild-and-retry when a
/// query arrives before any index exists.
#[async_trait]
pub trait IndexRebuilder: Send + Sync {
    /// Run a full rebuild and return the new snapshot.
    async fn rebuild(&self) -> Result<Arc<IndexSnapshot>>;
}

/// Query-side retrieval over the currently installed snapshot.
pub struct SimilarityRetriever {
    provider: Arc<dyn EmbeddingProvider>,
    snapshot: RwLock<Option<Arc<IndexSnapshot>>>,
    rebuilder: RwLock<Option<Arc<dyn IndexRebuilder>>>,
}

impl SimilarityRetriever {
    /// Create a retriever with no snapshot installed.
    pub fn new(provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            provider,
            snapshot: RwLock::new(None),
            rebuilder: RwLock::new(None),
        }
    }

    /// Swap in a freshly built snapshot.
    pub fn install(&self, snapshot: Arc<IndexSnapshot>) {
        debug!(rows = snapshot.rows(), dim = snapshot.dim(), "installing index snapshot");
        *self.snapshot.write() = Some(snapshot);
    }

    /// The currently installed snapshot, if any.
    pub fn snapshot(&self) -> Option<Arc<IndexSnapshot>> {
        self.snapshot.read().clone()
    }

    /// Configure the automatic rebuild-and-retry hook.
    pub fn set_rebuilder(&self, rebuilder: Arc<dyn IndexRebuilder>) {
        *self.rebuilder.write() = Some(rebuilder);
    }

    /// The document returned when no index exists and rebuild is
    /// unavailable or failed. Keeps the caller's contract uniform: the
    /// user is told how to recover instead of an error propagating.
    pub fn sentinel_document() -> Document {
        Document::new(
            "Please say 'rebuild database' to refresh my device list.",
            "assistant.rebuild_request",
            "assistant",
        )
    }

    /// Embed `query_text` and return the top `k` documents.
    ///
    /// Degenerate cases: no snapshot → one automatic rebuild attempt (if a
    /// rebuilder is configured), then the sentinel document; embedding
    /// failure → empty results. Never an error.
    pub async fn query(&self, query_text: &str, k: usize) -> Vec<ScoredDocument> {
        let snapshot = match self.snapshot() {
            Some(s) => s,
            None => match self.try_rebuild().await {
                Some(s) => s,
                None => {
                    return vec![ScoredDocument {
                        document: Self::sentinel_document(),
                        score: 0.0,
                    }];
                }
            },
        };

        let query = match self.provider.embed(&[query_text.to_string()]).await {
            Ok(mut vectors) if !vectors.is_empty() => vectors.remove(0),
            Ok(_) => {
                warn!("embedding provider returned no vector for query");
                return Vec::new();
            }
            Err(error) => {
                warn!(%error, "query embedding failed, returning no candidates");
                return Vec::new();
            }
        };

        if query.len() != snapshot.dim() {
            warn!(
                query_dim = query.len(),
                index_dim = snapshot.dim(),
                "query dimensionality does not match index"
            );
            return Vec::new();
        }

        let results = snapshot.search(&query, k);
        debug!(count = results.len(), "similarity query complete");
        results
    }

    async fn try_rebuild(&self) -> Option<Arc<IndexSnapshot>> {
        let rebuilder = self.rebuilder.read().clone()?;
        debug!("no index installed, attempting automatic rebuild");
        match rebuilder.rebuild().await {
            Ok(snapshot) => {
                self.install(Arc::clone(&snapshot));
                Some(snapshot)
            }
            Err(error) => {
                warn!(%error, "automatic index rebuild failed");
                None
            }
        }
    }
}
