//! Embedding provider trait for generating text embeddings

use async_trait::async_trait;
use serde::Serialize;

use crate::error::Result;

/// Whether a text is a search query or an indexed document.
/// Retrieval-tuned models embed the two differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InputType {
    Query,
    Document,
}

/// Trait for generating text embeddings
///
/// Implementations:
/// - `VoyageEmbedder`: Voyage AI hosted API (voyage-large-2)
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a batch of texts, preserving order
    async fn embed(&self, texts: &[String], input_type: InputType) -> Result<Vec<Vec<f32>>>;

    /// Embed a single search query
    async fn embed_query(&self, query: &str) -> Result<Vec<f32>> {
        let mut embeddings = self.embed(&[query.to_string()], InputType::Query).await?;
        embeddings
            .pop()
            .ok_or_else(|| crate::error::Error::embedding("No embedding returned for query"))
    }

    /// Embed documents for indexing
    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        self.embed(texts, InputType::Document).await
    }

    /// Embedding dimensions
    fn dimensions(&self) -> usize;

    /// Provider name for logging
    fn name(&self) -> &str;
}
