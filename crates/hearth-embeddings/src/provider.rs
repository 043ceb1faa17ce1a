//! Embedding provider abstraction.

use async_trait::async_trait;

use crate::errors::Result;

/// Produces embedding vectors for batches of text.
///
/// Every call within one store's lifetime must return vectors of the same
/// dimensionality; the store verifies this during rebuild and fails the
/// whole rebuild on a mismatch.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a batch of texts, one vector per input, in input order.
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;
}
