//! Voyage AI embedding provider

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::embedding::{EmbeddingProvider, InputType};
use super::retry::RetryPolicy;
use crate::config::EmbeddingConfig;
use crate::error::{Error, Result};

/// Voyage AI embeddings client with automatic retry
pub struct VoyageEmbedder {
    client: Client,
    config: EmbeddingConfig,
    retry: RetryPolicy,
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    input: &'a [String],
    model: &'a str,
    input_type: InputType,
}

#[derive(Deserialize)]
struct EmbedResponse {
    data: Vec<EmbedData>,
}

#[derive(Deserialize)]
struct EmbedData {
    embedding: Vec<f32>,
    index: usize,
}

impl VoyageEmbedder {
    /// Create a new embedder
    pub fn new(config: &EmbeddingConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(5)
            .build()?;

        Ok(Self {
            client,
            retry: RetryPolicy::new(config.max_retries),
            config: config.clone(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/embeddings", self.config.base_url.trim_end_matches('/'))
    }

    /// One request for at most `batch_size` texts
    async fn embed_batch(&self, texts: &[String], input_type: InputType) -> Result<Vec<Vec<f32>>> {
        let url = self.endpoint();

        self.retry
            .run("Voyage embedding request", || {
                let url = url.clone();
                async move {
                    let request = EmbedRequest {
                        input: texts,
                        model: &self.config.model,
                        input_type,
                    };

                    let response = self
                        .client
                        .post(&url)
                        .bearer_auth(&self.config.api_key)
                        .json(&request)
                        .send()
                        .await
                        .map_err(|e| Error::embedding(format!("Voyage request failed: {}", e)))?;

                    if !response.status().is_success() {
                        let status = response.status();
                        let body = response.text().await.unwrap_or_default();
                        return Err(Error::api("Voyage", status.as_u16(), body));
                    }

                    let embed_response: EmbedResponse = response.json().await.map_err(|e| {
                        Error::embedding(format!("Failed to parse Voyage response: {}", e))
                    })?;

                    order_embeddings(embed_response.data, texts.len())
                }
            })
            .await
    }
}

/// Put embeddings back in input order and check none are missing
fn order_embeddings(mut data: Vec<EmbedData>, expected: usize) -> Result<Vec<Vec<f32>>> {
    if data.len() != expected {
        return Err(Error::embedding(format!(
            "Expected {} embeddings, got {}",
            expected,
            data.len()
        )));
    }
    data.sort_by_key(|d| d.index);
    Ok(data.into_iter().map(|d| d.embedding).collect())
}

#[async_trait]
impl EmbeddingProvider for VoyageEmbedder {
    async fn embed(&self, texts: &[String], input_type: InputType) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let mut all_embeddings = Vec::with_capacity(texts.len());
        for batch in texts.chunks(self.config.batch_size.max(1)) {
            all_embeddings.extend(self.embed_batch(batch, input_type).await?);
        }

        tracing::debug!("Embedded {} texts as {:?}", texts.len(), input_type);
        Ok(all_embeddings)
    }

    fn dimensions(&self) -> usize {
        self.config.dimensions
    }

    fn name(&self) -> &str {
        "voyage"
    }
}
