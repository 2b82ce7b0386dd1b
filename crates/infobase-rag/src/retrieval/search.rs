//! Query embedding, similarity search and link presentation

use std::collections::HashSet;

use crate::error::Result;
use crate::providers::{EmbeddingProvider, VectorStoreProvider};
use crate::types::{RelatedLink, SearchHit};

/// Embed `query` and return the `k` most similar extracts, best first
pub async fn find_extracts(
    query: &str,
    embedder: &dyn EmbeddingProvider,
    store: &dyn VectorStoreProvider,
    k: usize,
) -> Result<Vec<SearchHit>> {
    let embedding = embedder.embed_query(query).await?;
    let hits = store.search(&embedding, k).await?;

    tracing::debug!(
        "Found {} extracts via {}/{}",
        hits.len(),
        embedder.name(),
        store.name()
    );
    Ok(hits)
}

/// Links shown to the user: newest article first, one link per title
pub fn related_links(hits: &[SearchHit]) -> Vec<RelatedLink> {
    let mut by_date: Vec<&SearchHit> = hits.iter().collect();
    // Stable, so equal dates keep similarity order
    by_date.sort_by(|a, b| b.extract.metadata.date.cmp(&a.extract.metadata.date));

    let mut seen = HashSet::new();
    by_date
        .into_iter()
        .filter(|&hit| seen.insert(hit.extract.metadata.title.as_str()))
        .map(|hit| RelatedLink::from(&hit.extract.metadata))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::mock::KeywordEmbedder;
    use crate::providers::LocalVectorStore;
    use crate::types::{ArticleMetadata, Extract};

    fn hit(title: &str, date: &str, similarity: f32) -> SearchHit {
        SearchHit {
            extract: Extract::new(
                format!("{} text", title),
                ArticleMetadata::new(title, format!("https://example.org/{}", title), "desc", date),
            ),
            similarity,
        }
    }

    #[test]
    fn test_related_links_newest_first_unique() {
        let hits = vec![
            hit("Vaping", "2022-05-01", 0.9),
            hit("Mental health", "2024-01-15", 0.8),
            hit("Vaping", "2022-05-01", 0.7),
            hit("Opioids", "2023-03-03", 0.6),
        ];

        let links = related_links(&hits);
        let titles: Vec<&str> = links.iter().map(|l| l.title.as_str()).collect();
        assert_eq!(titles, vec!["Mental health", "Opioids", "Vaping"]);
        assert_eq!(links[2].url, "https://example.org/Vaping");
    }

    #[test]
    fn test_related_links_same_date_keeps_rank() {
        let hits = vec![hit("B", "2024-01-01", 0.9), hit("A", "2024-01-01", 0.5)];
        let links = related_links(&hits);
        assert_eq!(links[0].title, "B");
        assert_eq!(links[1].title, "A");
    }

    #[test]
    fn test_related_links_empty() {
        assert!(related_links(&[]).is_empty());
    }

    #[tokio::test]
    async fn test_find_extracts() {
        let embedder = KeywordEmbedder::new(vec!["vaccine", "smoking", "sleep"]);
        let store = LocalVectorStore::new(3);
        for (title, text) in [
            ("Vaccines", "vaccine coverage vaccine schedule"),
            ("Tobacco", "smoking cessation and smoking rates"),
            ("Sleep", "sleep duration among adults"),
        ] {
            store
                .insert(
                    Extract::new(text, ArticleMetadata::new(title, "", "", "2024-01-01")),
                    embedder.vectorize(text),
                )
                .unwrap();
        }

        let hits = find_extracts("smoking and more smoking, little sleep", &embedder, &store, 2)
            .await
            .unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].extract.metadata.title, "Tobacco");
        assert_eq!(hits[1].extract.metadata.title, "Sleep");
    }
}
