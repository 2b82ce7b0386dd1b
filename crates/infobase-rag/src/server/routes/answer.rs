//! Answer endpoint

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};

use super::QueryPairs;
use crate::error::ApiError;
use crate::generation::generate_answer;
use crate::server::state::AppState;
use crate::types::{AnswerResponse, Lang};

/// Query-string parameters of `/api/answer`
#[derive(Debug, Default)]
pub struct AnswerParams {
    /// Key returned by `/api/related?cache=TRUE`
    pub id: Option<String>,
    pub lang: Option<String>,
}

impl From<QueryPairs> for AnswerParams {
    fn from(pairs: QueryPairs) -> Self {
        Self {
            id: pairs.first("id"),
            lang: pairs.first("lang"),
        }
    }
}

/// GET|POST /api/answer - summarize the best extract for a cached query.
///
/// The cached entry is consumed whatever the outcome.
pub async fn answer(
    State(state): State<AppState>,
    Query(pairs): Query<QueryPairs>,
) -> Result<(StatusCode, Json<AnswerResponse>), ApiError> {
    let params = AnswerParams::from(pairs);
    let requested = params.lang.as_deref().map(|l| Lang::from_param(Some(l)));

    let cached = params
        .id
        .as_deref()
        .and_then(|id| state.query_cache().take(id))
        .ok_or_else(|| {
            tracing::warn!("Error// Invalid id: {:?}", params.id);
            ApiError::InvalidId(requested.unwrap_or_default())
        })?;

    let lang = requested.unwrap_or(cached.lang);

    let answer = generate_answer(
        &cached.query,
        &cached.extract,
        state.llm_provider().as_ref(),
        lang,
    )
    .await
    .map_err(|e| {
        tracing::error!("Error// Answer generation failed: {}", e);
        ApiError::Internal(lang)
    })?;

    match state.answer_guard().check(&answer) {
        Ok(()) => {
            tracing::info!("Answered \"{}\" from {}", cached.query, cached.extract.metadata.link);
            Ok((StatusCode::OK, Json(AnswerResponse { answer })))
        }
        Err(rejection) => {
            tracing::warn!("Error// Answer rejected ({:?}) for \"{}\"", rejection, cached.query);
            Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(AnswerResponse {
                    answer: lang.no_answer().to_string(),
                }),
            ))
        }
    }
}
