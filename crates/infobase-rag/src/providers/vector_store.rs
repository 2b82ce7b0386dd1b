//! Vector store provider trait for similarity search

use async_trait::async_trait;

use crate::error::Result;
use crate::types::SearchHit;

/// Trait for nearest-neighbour search over indexed extracts
///
/// Implementations:
/// - `LocalVectorStore`: flat cosine index loaded from disk
#[async_trait]
pub trait VectorStoreProvider: Send + Sync {
    /// Top `k` extracts, most similar first
    async fn search(&self, query_embedding: &[f32], k: usize) -> Result<Vec<SearchHit>>;

    /// Number of extracts stored
    async fn len(&self) -> Result<usize>;

    /// Check if store is empty
    async fn is_empty(&self) -> Result<bool> {
        Ok(self.len().await? == 0)
    }

    /// Provider name for logging
    fn name(&self) -> &str;
}
