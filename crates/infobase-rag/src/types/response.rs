//! Response bodies for the HTTP API

use serde::{Deserialize, Serialize};

use super::article::ArticleMetadata;

/// A related article as shown to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedLink {
    pub title: String,
    pub url: String,
    pub description: String,
    pub date: String,
}

impl From<&ArticleMetadata> for RelatedLink {
    fn from(meta: &ArticleMetadata) -> Self {
        Self {
            title: meta.title.clone(),
            url: meta.link.clone(),
            description: meta.description.clone(),
            date: meta.date.clone(),
        }
    }
}

/// `GET/POST /api/related` response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelatedResponse {
    pub links: Vec<RelatedLink>,
    /// Cache key to pass to `/api/answer`, present when caching was requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// `GET/POST /api/answer` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerResponse {
    pub answer: String,
}
