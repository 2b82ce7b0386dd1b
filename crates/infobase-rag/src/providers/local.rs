//! Local vector index
//!
//! A flat cosine-similarity index over article extracts, persisted as a single
//! JSON file inside an index directory. Partial indexes built batch by batch
//! are merged into one before serving.

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::vector_store::VectorStoreProvider;
use crate::error::{Error, Result};
use crate::types::{Extract, SearchHit};

/// File name of the index inside its directory
pub const INDEX_FILE: &str = "index.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct IndexEntry {
    extract: Extract,
    embedding: Vec<f32>,
}

#[derive(Serialize, Deserialize)]
struct IndexFile {
    dimensions: usize,
    entries: Vec<IndexEntry>,
}

/// In-memory flat index
pub struct LocalVectorStore {
    dimensions: usize,
    entries: Arc<RwLock<Vec<IndexEntry>>>,
}

impl LocalVectorStore {
    /// Create an empty index
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            entries: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Load an index directory written by [`save`](Self::save)
    pub fn load(dir: &Path) -> Result<Self> {
        let path = index_path(dir);
        let raw = std::fs::read_to_string(&path).map_err(|e| {
            Error::vector_db(format!("Failed to read index {}: {}", path.display(), e))
        })?;
        let file: IndexFile = serde_json::from_str(&raw)?;

        if let Some(bad) = file
            .entries
            .iter()
            .find(|e| e.embedding.len() != file.dimensions)
        {
            return Err(Error::vector_db(format!(
                "Extract {} has {} dimensions, index declares {}",
                bad.extract.id,
                bad.embedding.len(),
                file.dimensions
            )));
        }

        tracing::info!(
            "Loaded {} extracts from {}",
            file.entries.len(),
            path.display()
        );

        Ok(Self {
            dimensions: file.dimensions,
            entries: Arc::new(RwLock::new(file.entries)),
        })
    }

    /// Write the index to `dir/index.json`, creating `dir` if needed
    pub fn save(&self, dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = index_path(dir);

        let file = IndexFile {
            dimensions: self.dimensions,
            entries: self.entries.read().clone(),
        };
        std::fs::write(&path, serde_json::to_string(&file)?)?;

        tracing::debug!("Saved {} extracts to {}", file.entries.len(), path.display());
        Ok(path)
    }

    /// Add an extract with its embedding
    pub fn insert(&self, extract: Extract, embedding: Vec<f32>) -> Result<()> {
        if embedding.len() != self.dimensions {
            return Err(Error::vector_db(format!(
                "Embedding has {} dimensions, index expects {}",
                embedding.len(),
                self.dimensions
            )));
        }
        self.entries.write().push(IndexEntry { extract, embedding });
        Ok(())
    }

    /// Append every extract of `other`
    pub fn merge(&self, other: &LocalVectorStore) -> Result<()> {
        if other.dimensions != self.dimensions {
            return Err(Error::vector_db(format!(
                "Cannot merge a {}-dimension index into a {}-dimension index",
                other.dimensions, self.dimensions
            )));
        }
        let incoming = other.entries.read().clone();
        self.entries.write().extend(incoming);
        Ok(())
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Number of extracts
    pub fn count(&self) -> usize {
        self.entries.read().len()
    }

    /// Blocking top-k search
    pub fn search_blocking(&self, query: &[f32], k: usize) -> Result<Vec<SearchHit>> {
        search_entries(&self.entries.read(), self.dimensions, query, k)
    }
}

fn index_path(dir: &Path) -> PathBuf {
    dir.join(INDEX_FILE)
}

fn search_entries(
    entries: &[IndexEntry],
    dimensions: usize,
    query: &[f32],
    k: usize,
) -> Result<Vec<SearchHit>> {
    if query.len() != dimensions {
        return Err(Error::vector_db(format!(
            "Query has {} dimensions, index expects {}",
            query.len(),
            dimensions
        )));
    }

    let mut scored: Vec<(usize, f32)> = entries
        .iter()
        .enumerate()
        .map(|(i, entry)| (i, cosine_similarity(query, &entry.embedding)))
        .collect();

    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    scored.truncate(k);

    Ok(scored
        .into_iter()
        .map(|(i, similarity)| SearchHit {
            extract: entries[i].extract.clone(),
            similarity,
        })
        .collect())
}

/// Cosine similarity of two equal-length vectors. Zero vectors score 0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom <= f32::EPSILON {
        return 0.0;
    }
    dot / denom
}

#[async_trait]
impl VectorStoreProvider for LocalVectorStore {
    async fn search(&self, query_embedding: &[f32], k: usize) -> Result<Vec<SearchHit>> {
        let entries = Arc::clone(&self.entries);
        let dimensions = self.dimensions;
        let query = query_embedding.to_vec();

        tokio::task::spawn_blocking(move || search_entries(&entries.read(), dimensions, &query, k))
            .await
            .map_err(|e| Error::internal(format!("Task join error: {}", e)))?
    }

    async fn len(&self) -> Result<usize> {
        Ok(self.count())
    }

    fn name(&self) -> &str {
        "local-flat"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ArticleMetadata;

    fn extract(title: &str) -> Extract {
        Extract::new(
            format!("{} content", title),
            ArticleMetadata::new(title, format!("https://example.org/{}", title), "", "2024-01-01"),
        )
    }

    fn sample_store() -> LocalVectorStore {
        let store = LocalVectorStore::new(3);
        store.insert(extract("flu"), vec![1.0, 0.0, 0.0]).unwrap();
        store.insert(extract("covid"), vec![0.7, 0.7, 0.0]).unwrap();
        store.insert(extract("diabetes"), vec![0.0, 0.0, 1.0]).unwrap();
        store
    }

    #[test]
    fn test_cosine_similarity() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
    }

    #[test]
    fn test_search_orders_by_similarity() {
        let store = sample_store();
        let hits = store.search_blocking(&[0.9, 0.1, 0.0], 2).unwrap();

        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].extract.metadata.title, "flu");
        assert_eq!(hits[1].extract.metadata.title, "covid");
        assert!(hits[0].similarity >= hits[1].similarity);
    }

    #[test]
    fn test_dimension_mismatch() {
        let store = sample_store();
        assert!(store.insert(extract("bad"), vec![1.0]).is_err());
        assert!(store.search_blocking(&[1.0, 0.0], 1).is_err());
    }

    #[test]
    fn test_save_load_merge() {
        let dir = tempfile::tempdir().unwrap();
        let store = sample_store();
        store.save(&dir.path().join("vectorstore_0")).unwrap();

        let loaded = LocalVectorStore::load(&dir.path().join("vectorstore_0")).unwrap();
        assert_eq!(loaded.count(), 3);
        assert_eq!(loaded.dimensions(), 3);

        let other = LocalVectorStore::new(3);
        other.insert(extract("asthma"), vec![0.0, 1.0, 0.0]).unwrap();
        loaded.merge(&other).unwrap();
        assert_eq!(loaded.count(), 4);

        let hits = loaded.search_blocking(&[0.0, 1.0, 0.0], 1).unwrap();
        assert_eq!(hits[0].extract.metadata.title, "asthma");

        assert!(loaded.merge(&LocalVectorStore::new(2)).is_err());
    }

    #[test]
    fn test_load_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let result = LocalVectorStore::load(&dir.path().join("nope"));
        assert!(matches!(result, Err(Error::VectorDb(_))));
    }

    #[tokio::test]
    async fn test_provider_search() {
        let store = sample_store();
        let hits = VectorStoreProvider::search(&store, &[0.0, 0.0, 1.0], 1)
            .await
            .unwrap();
        assert_eq!(hits[0].extract.metadata.title, "diabetes");
        assert_eq!(VectorStoreProvider::len(&store).await.unwrap(), 3);
    }
}
