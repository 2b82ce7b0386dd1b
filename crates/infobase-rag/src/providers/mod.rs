//! Provider abstractions for embeddings, LLM and vector search
//!
//! The hosted services sit behind traits so the server and the index builder
//! can be driven by test doubles.

pub mod anthropic;
pub mod embedding;
pub mod llm;
pub mod local;
pub mod retry;
pub mod vector_store;
pub mod voyage;

#[cfg(test)]
pub(crate) mod mock;

pub use anthropic::AnthropicClient;
pub use embedding::{EmbeddingProvider, InputType};
pub use llm::LlmProvider;
pub use local::LocalVectorStore;
pub use vector_store::VectorStoreProvider;
pub use voyage::VoyageEmbedder;
