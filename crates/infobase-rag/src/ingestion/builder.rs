//! Vector index construction from scraped articles

use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use super::scraper::ScrapedArticle;
use super::splitter::TextSplitter;
use crate::config::{EmbeddingConfig, IngestConfig};
use crate::error::{Error, Result};
use crate::providers::{EmbeddingProvider, LocalVectorStore};
use crate::types::Extract;

/// Directory name of the merged index
pub const MERGED_DIR: &str = "vectorstore_merged";

/// Outcome of an index build
#[derive(Debug, Clone)]
pub struct BuildReport {
    /// Extracts embedded
    pub extracts: usize,
    /// Partial index directories, one per batch
    pub partials: Vec<PathBuf>,
    /// Merged index directory
    pub merged: PathBuf,
}

/// Splits articles, embeds the extracts batch by batch and writes the index
pub struct IndexBuilder {
    embedder: Arc<dyn EmbeddingProvider>,
    splitter: TextSplitter,
    output_dir: PathBuf,
    batch_size: usize,
    batch_delay: Duration,
    progress: bool,
}

impl IndexBuilder {
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        ingest: &IngestConfig,
        embeddings: &EmbeddingConfig,
    ) -> Self {
        Self {
            embedder,
            splitter: TextSplitter::new(ingest.chunk_size, ingest.chunk_overlap),
            output_dir: ingest.output_dir.clone(),
            batch_size: embeddings.batch_size.max(1),
            batch_delay: Duration::from_millis(ingest.batch_delay_ms),
            progress: true,
        }
    }

    /// Write indexes under `dir` instead of the configured output directory
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Show or hide the progress bar
    pub fn progress(mut self, show: bool) -> Self {
        self.progress = show;
        self
    }

    /// Split every article into extracts that carry its metadata
    pub fn extracts(&self, articles: &[ScrapedArticle]) -> Vec<Extract> {
        articles
            .iter()
            .flat_map(|article| {
                self.splitter
                    .split(&article.content)
                    .into_iter()
                    .map(|chunk| Extract::new(chunk, article.metadata.clone()))
            })
            .collect()
    }

    /// Build the index. Each batch is saved as `vectorstore_{offset}` before
    /// the next one is embedded, then all batches are merged.
    pub async fn build(&self, articles: &[ScrapedArticle]) -> Result<BuildReport> {
        let extracts = self.extracts(articles);
        if extracts.is_empty() {
            return Err(Error::internal("No article content to index"));
        }
        tracing::info!(
            "Creating index with {} extracts from {} articles",
            extracts.len(),
            articles.len()
        );

        let bar = self.progress_bar(extracts.len());
        let mut partials = Vec::new();
        let batches: Vec<&[Extract]> = extracts.chunks(self.batch_size).collect();

        for (n, batch) in batches.iter().enumerate() {
            let offset = n * self.batch_size;
            let texts: Vec<String> = batch.iter().map(|e| e.page_content.clone()).collect();
            let embeddings = self.embedder.embed_documents(&texts).await?;

            let partial = LocalVectorStore::new(self.embedder.dimensions());
            for (extract, embedding) in batch.iter().zip(embeddings) {
                partial.insert(extract.clone(), embedding)?;
            }

            let dir = self.output_dir.join(format!("vectorstore_{}", offset));
            partial.save(&dir)?;
            partials.push(dir);
            bar.inc(batch.len() as u64);

            if n + 1 < batches.len() {
                tokio::time::sleep(self.batch_delay).await;
            }
        }
        bar.finish_with_message("embedded");

        let merged = self.output_dir.join(MERGED_DIR);
        let count = merge_partials(&partials, self.embedder.dimensions(), &merged)?;
        tracing::info!("Merged {} partial indexes into {}", partials.len(), merged.display());

        Ok(BuildReport {
            extracts: count,
            partials,
            merged,
        })
    }

    fn progress_bar(&self, len: usize) -> ProgressBar {
        if !self.progress {
            return ProgressBar::hidden();
        }
        let bar = ProgressBar::new(len as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} extracts ({eta})")
        {
            bar.set_style(style.progress_chars("#>-"));
        }
        bar
    }
}

/// Load partial index directories and save their union to `target`.
/// Returns the number of extracts in the merged index.
pub fn merge_partials(partials: &[PathBuf], dimensions: usize, target: &Path) -> Result<usize> {
    let merged = LocalVectorStore::new(dimensions);
    for dir in partials {
        merged.merge(&LocalVectorStore::load(dir)?)?;
    }
    merged.save(target)?;
    Ok(merged.count())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::mock::KeywordEmbedder;
    use crate::providers::VectorStoreProvider;
    use crate::types::ArticleMetadata;

    fn article(title: &str, content: &str) -> ScrapedArticle {
        ScrapedArticle {
            metadata: ArticleMetadata::new(title, format!("https://example.org/{}", title), "", "2024-01-01"),
            content: content.to_string(),
        }
    }

    fn builder(dir: &Path, batch_size: usize) -> IndexBuilder {
        let ingest = IngestConfig {
            chunk_size: 40,
            chunk_overlap: 0,
            batch_delay_ms: 0,
            ..IngestConfig::default()
        };
        let embeddings = EmbeddingConfig {
            batch_size,
            ..EmbeddingConfig::default()
        };
        IndexBuilder::new(Arc::new(KeywordEmbedder::new(vec!["flu", "measles"])), &ingest, &embeddings)
            .output_dir(dir)
            .progress(false)
    }

    #[test]
    fn test_extracts_carry_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let extracts = builder(dir.path(), 2).extracts(&[
            article("flu", "Flu season starts in the fall. Get your flu shot early in October."),
            article("empty", "   "),
        ]);

        assert_eq!(extracts.len(), 2);
        assert!(extracts.iter().all(|e| e.metadata.title == "flu"));
        assert!(extracts.iter().all(|e| e.page_content.chars().count() <= 40));
    }

    #[tokio::test]
    async fn test_build_writes_partials_and_merged() {
        let dir = tempfile::tempdir().unwrap();
        let articles = vec![
            article("flu", "Flu flu flu."),
            article("measles", "Measles spreads fast."),
            article("both", "Flu and measles."),
        ];

        let report = builder(dir.path(), 2).build(&articles).await.unwrap();
        assert_eq!(report.extracts, 3);
        assert_eq!(
            report.partials,
            vec![dir.path().join("vectorstore_0"), dir.path().join("vectorstore_2")]
        );
        assert_eq!(report.merged, dir.path().join(MERGED_DIR));

        let index = LocalVectorStore::load(&report.merged).unwrap();
        let hits = index.search(&[0.0, 1.0], 1).await.unwrap();
        assert_eq!(hits[0].extract.metadata.title, "measles");
    }

    #[tokio::test]
    async fn test_build_without_content_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = builder(dir.path(), 2).build(&[article("empty", "")]).await;
        assert!(result.is_err());
    }
}
