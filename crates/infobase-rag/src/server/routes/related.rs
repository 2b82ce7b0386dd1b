//! Related-articles endpoint

use axum::{
    extract::{Query, State},
    Json,
};

use super::QueryPairs;
use crate::error::ApiError;
use crate::moderation::{validate_query, QueryRejection};
use crate::retrieval::{find_extracts, related_links};
use crate::server::state::AppState;
use crate::types::{Lang, RelatedResponse};

/// Query-string parameters of `/api/related`
#[derive(Debug, Default)]
pub struct RelatedParams {
    pub query: Option<String>,
    /// `TRUE` stores the query for a follow-up `/api/answer` call
    pub cache: Option<String>,
    pub lang: Option<String>,
}

impl From<QueryPairs> for RelatedParams {
    fn from(pairs: QueryPairs) -> Self {
        Self {
            query: pairs.first("query"),
            cache: pairs.first("cache"),
            lang: pairs.first("lang"),
        }
    }
}

/// GET|POST /api/related - articles related to a question
pub async fn related(
    State(state): State<AppState>,
    Query(pairs): Query<QueryPairs>,
) -> Result<Json<RelatedResponse>, ApiError> {
    let params = RelatedParams::from(pairs);
    let lang = Lang::from_param(params.lang.as_deref());
    let max_chars = state.config().moderation.max_query_chars;

    let query = validate_query(params.query.as_deref(), max_chars).map_err(|rejection| {
        match rejection {
            QueryRejection::Missing => {
                tracing::warn!("Error// No query provided");
                ApiError::NoQuery(lang)
            }
            QueryRejection::CodeCharacters => {
                tracing::warn!("Error// Invalid query: {:?}", params.query);
                ApiError::InvalidQuery(lang)
            }
            QueryRejection::TooLong => {
                tracing::warn!("Error// Query too long ({} characters max)", max_chars);
                ApiError::QueryTooLong(lang)
            }
        }
    })?;

    let hits = find_extracts(
        query,
        state.embedding_provider().as_ref(),
        state.vector_store(lang).as_ref(),
        state.config().index.top_k,
    )
    .await
    .map_err(|e| {
        tracing::error!("Error// Retrieval failed for \"{}\": {}", query, e);
        ApiError::Internal(lang)
    })?;

    let links = related_links(&hits);

    let id = match (params.cache.as_deref(), hits.first()) {
        (Some("TRUE"), Some(best)) => {
            Some(state.query_cache().insert(query, best.extract.clone(), lang))
        }
        _ => None,
    };

    tracing::info!(
        "Query \"{}\" ({}): {} links{}",
        query,
        lang.code(),
        links.len(),
        if id.is_some() { ", cached" } else { "" }
    );

    Ok(Json(RelatedResponse { links, id }))
}
