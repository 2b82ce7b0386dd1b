//! Application state for the RAG server

use std::sync::Arc;
use std::time::Duration;

use crate::cache::QueryCache;
use crate::config::RagConfig;
use crate::error::Result;
use crate::moderation::AnswerGuard;
use crate::providers::{
    AnthropicClient, EmbeddingProvider, LlmProvider, LocalVectorStore, VectorStoreProvider,
    VoyageEmbedder,
};
use crate::types::Lang;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: RagConfig,
    /// Embedding provider (Voyage AI)
    embedding_provider: Arc<dyn EmbeddingProvider>,
    /// LLM provider (Anthropic)
    llm_provider: Arc<dyn LlmProvider>,
    /// English index
    store_en: Arc<dyn VectorStoreProvider>,
    /// French index, when one was built
    store_fr: Option<Arc<dyn VectorStoreProvider>>,
    /// Pending queries between `/api/related` and `/api/answer`
    query_cache: Arc<QueryCache>,
    /// Filters applied to generated answers
    answer_guard: AnswerGuard,
}

impl AppState {
    /// Build state with the hosted providers and on-disk indexes
    pub fn new(config: RagConfig) -> Result<Self> {
        tracing::info!("Initializing RAG application state...");

        let embedding_provider = Arc::new(VoyageEmbedder::new(&config.embeddings)?);
        let llm_provider = Arc::new(AnthropicClient::new(&config.llm)?);
        tracing::info!(
            "Providers initialized (embedding: {}, llm: {})",
            config.embeddings.model,
            config.llm.model
        );

        let store_en = Self::open_index(&config, Lang::En)?;
        let store_fr = match &config.index.fr_path {
            Some(_) => Some(Self::open_index(&config, Lang::Fr)?),
            None => None,
        };

        Ok(Self::from_parts(
            config,
            embedding_provider,
            llm_provider,
            store_en,
            store_fr,
        ))
    }

    /// Build state from already constructed providers
    pub fn from_parts(
        config: RagConfig,
        embedding_provider: Arc<dyn EmbeddingProvider>,
        llm_provider: Arc<dyn LlmProvider>,
        store_en: Arc<dyn VectorStoreProvider>,
        store_fr: Option<Arc<dyn VectorStoreProvider>>,
    ) -> Self {
        let query_cache = Arc::new(QueryCache::new(Duration::from_secs(config.cache.ttl_secs)));
        let answer_guard = AnswerGuard::new(&config.moderation);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                embedding_provider,
                llm_provider,
                store_en,
                store_fr,
                query_cache,
                answer_guard,
            }),
        }
    }

    fn open_index(config: &RagConfig, lang: Lang) -> Result<Arc<dyn VectorStoreProvider>> {
        let path = config.index.path_for(lang);
        let store = LocalVectorStore::load(path)?;

        if store.dimensions() != config.embeddings.dimensions {
            tracing::warn!(
                "Index {} has {} dimensions but embeddings.dimensions is {}",
                path.display(),
                store.dimensions(),
                config.embeddings.dimensions
            );
        }
        tracing::info!("{} index ready ({} extracts)", lang.code(), store.count());
        Ok(Arc::new(store))
    }

    /// Get configuration
    pub fn config(&self) -> &RagConfig {
        &self.inner.config
    }

    /// Get embedding provider
    pub fn embedding_provider(&self) -> &Arc<dyn EmbeddingProvider> {
        &self.inner.embedding_provider
    }

    /// Get LLM provider
    pub fn llm_provider(&self) -> &Arc<dyn LlmProvider> {
        &self.inner.llm_provider
    }

    /// Index for a request language. French falls back to English.
    pub fn vector_store(&self, lang: Lang) -> &Arc<dyn VectorStoreProvider> {
        match (lang, &self.inner.store_fr) {
            (Lang::Fr, Some(store)) => store,
            _ => &self.inner.store_en,
        }
    }

    /// Get query cache
    pub fn query_cache(&self) -> &Arc<QueryCache> {
        &self.inner.query_cache
    }

    /// Get answer guard
    pub fn answer_guard(&self) -> &AnswerGuard {
        &self.inner.answer_guard
    }
}
