//! API routes for the RAG server

pub mod answer;
pub mod related;

use axum::{routing::get, Router};
use serde::Deserialize;

use crate::server::state::AppState;

/// Build all API routes. Both endpoints take query-string parameters on
/// GET and POST alike.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/related", get(related::related).post(related::related))
        .route("/answer", get(answer::answer).post(answer::answer))
}

/// Query-string pairs in request order.
///
/// Repeated keys are allowed and the first value wins, so extraction never
/// fails and every client error goes through `ApiError`.
#[derive(Debug, Default, Deserialize)]
#[serde(transparent)]
pub struct QueryPairs(Vec<(String, String)>);

impl QueryPairs {
    /// First value given for `key`
    pub fn first(&self, key: &str) -> Option<String> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use axum::{body::Body, http::Request, Router};
    use serde_json::Value;
    use std::sync::Arc;
    use tower::ServiceExt;

    use crate::config::RagConfig;
    use crate::providers::mock::{CannedLlm, KeywordEmbedder};
    use crate::providers::{LocalVectorStore, LlmProvider};
    use crate::server::state::AppState;
    use crate::types::{ArticleMetadata, Extract};

    pub const VOCABULARY: [&str; 3] = ["flu", "measles", "vaccine"];

    fn article(title: &str, date: &str) -> ArticleMetadata {
        ArticleMetadata::new(
            title,
            format!("https://health-infobase.canada.ca/{}", title.to_lowercase()),
            format!("About {}", title),
            date,
        )
    }

    /// State over a three-article index and the given model
    pub fn state_with(llm: Arc<dyn LlmProvider>) -> AppState {
        let embedder = Arc::new(KeywordEmbedder::new(VOCABULARY.to_vec()));
        let store = LocalVectorStore::new(VOCABULARY.len());
        let docs = [
            ("Flu", "2023-10-01", "Flu season starts in the fall. Flu flu."),
            ("Measles", "2024-03-15", "Measles outbreaks follow low vaccine uptake."),
            ("Vaccines", "2022-01-20", "Vaccine coverage for flu and measles."),
        ];
        for (title, date, text) in docs {
            store
                .insert(Extract::new(text, article(title, date)), embedder.vectorize(text))
                .unwrap();
        }

        AppState::from_parts(RagConfig::default(), embedder, llm, Arc::new(store), None)
    }

    pub fn state_replying(reply: &str) -> AppState {
        state_with(Arc::new(CannedLlm::replying(reply)))
    }

    pub fn app(state: AppState) -> Router {
        Router::new()
            .nest("/api", super::api_routes())
            .with_state(state)
    }

    /// Send a request and decode the JSON body
    pub async fn call(app: Router, method: &str, uri: &str) -> (u16, Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status().as_u16();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }
}
