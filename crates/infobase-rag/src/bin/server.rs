//! RAG Server binary
//!
//! Run with: cargo run -p infobase-rag --bin infobase-rag-server [config.toml]
//!
//! The config path may also be given through `INFOBASE_CONFIG`.

use std::path::PathBuf;

use infobase_rag::{config::RagConfig, logging, server::RagServer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("INFOBASE_CONFIG").ok())
        .map(PathBuf::from);

    let config = RagConfig::load(config_path.as_deref())?;
    logging::init(&config.logging);
    config.validate()?;

    tracing::info!("Configuration loaded");
    tracing::info!("  - Embedding model: {}", config.embeddings.model);
    tracing::info!("  - LLM model: {}", config.llm.model);
    tracing::info!("  - Index: {}", config.index.path.display());
    tracing::info!(
        "  - Cache TTL: {}s (swept every {}s)",
        config.cache.ttl_secs,
        config.cache.sweep_interval_secs
    );

    let server = RagServer::new(config)?;

    println!("\nServer starting...");
    println!("  API: http://{}", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("\nEndpoints:");
    println!("  GET|POST /api/related?query=&cache=TRUE&lang=  - Related articles");
    println!("  GET|POST /api/answer?id=&lang=                 - Generated answer");
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
