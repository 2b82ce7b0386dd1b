//! Article metadata and indexed extracts

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Metadata of an Infobase article, carried through retrieval unchanged
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleMetadata {
    pub title: String,
    /// Article URL
    pub link: String,
    pub description: String,
    /// Publication date as published by the catalogue (ISO `YYYY-MM-DD`)
    pub date: String,
    /// Any other catalogue fields (topic, format, icon, org, ...)
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ArticleMetadata {
    pub fn new(
        title: impl Into<String>,
        link: impl Into<String>,
        description: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
            description: description.into(),
            date: date.into(),
            extra: serde_json::Map::new(),
        }
    }
}

/// A chunk of article text stored in the vector index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extract {
    /// Unique extract ID
    pub id: Uuid,
    /// Chunk text
    pub page_content: String,
    /// Metadata of the article the chunk came from
    pub metadata: ArticleMetadata,
}

impl Extract {
    pub fn new(page_content: impl Into<String>, metadata: ArticleMetadata) -> Self {
        Self {
            id: Uuid::new_v4(),
            page_content: page_content.into(),
            metadata,
        }
    }
}

/// An extract returned by a similarity search
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub extract: Extract,
    /// Cosine similarity (-1.0 to 1.0, higher is more similar)
    pub similarity: f32,
}
