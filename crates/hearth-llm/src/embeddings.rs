//! OpenAI-compatible embeddings client.
//!
//! Implements the `hearth-embeddings` provider trait over the `/v1/embeddings`
//! endpoint, so the store and retriever stay ignorant of HTTP.

use async_trait::async_trait;
use hearth_embeddings::{EmbeddingProvider, IndexError};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::openai::OpenAiConfig;

/// Remote embeddings provider.
pub struct OpenAiEmbeddings {
    config: OpenAiConfig,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingDatum>,
}

#[derive(Deserialize)]
struct EmbeddingDatum {
    index: usize,
    embedding: Vec<f32>,
}

impl OpenAiEmbeddings {
    /// Create a new client. `config.temperature` is ignored.
    pub fn new(config: OpenAiConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    /// Create a new client with a shared HTTP client.
    pub fn with_client(config: OpenAiConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbeddings {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, IndexError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!("{}/v1/embeddings", self.config.base_url);
        debug!(model = %self.config.model, batch = texts.len(), "sending embeddings request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&EmbeddingsRequest {
                model: &self.config.model,
                input: texts,
            })
            .send()
            .await
            .map_err(|e| IndexError::Embedding(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(IndexError::Embedding(format!("API error ({status}): {message}")));
        }

        let body: EmbeddingsResponse = response
            .json()
            .await
            .map_err(|e| IndexError::Embedding(e.to_string()))?;

        // The API is ordered, but `index` is authoritative.
        let mut data = body.data;
        data.sort_by_key(|d| d.index);
        Ok(data.into_iter().map(|d| d.embedding).collect())
    }
}
