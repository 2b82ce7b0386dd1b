//! Core types for the RAG service

pub mod article;
pub mod lang;
pub mod response;

pub use article::{ArticleMetadata, Extract, SearchHit};
pub use lang::Lang;
pub use response::{AnswerResponse, RelatedLink, RelatedResponse};
