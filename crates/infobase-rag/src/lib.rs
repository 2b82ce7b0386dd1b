//! infobase-rag: question answering over Health Infobase articles
//!
//! A query is embedded, matched against a vector index of scraped article
//! extracts, and the best extract is summarized by a hosted LLM. Generated
//! answers pass through moderation filters before they are shown.
//!
//! The crate also holds the offline pipeline that scrapes the articles and
//! builds the index (see [`ingestion`]).

pub mod cache;
pub mod config;
pub mod error;
pub mod generation;
pub mod ingestion;
pub mod logging;
pub mod moderation;
pub mod providers;
pub mod retrieval;
pub mod server;
pub mod types;

pub use config::RagConfig;
pub use error::{ApiError, Error, Result};
pub use server::RagServer;
pub use types::{ArticleMetadata, Extract, Lang, RelatedLink, SearchHit};
