//! HTTP endpoint exposing quote extraction.

use crate::config::ScraperConfig;
use crate::error::{Result, ScrapeError};
use crate::orchestrator::QuoteExtractor;
use crate::results::QuotesResponse;
use axum::{
    Json, Router,
    extract::{Query, State},
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Extractor built once at start-up and shared by every request
    pub extractor: Arc<QuoteExtractor>,
    /// Pages visited per request
    pub max_pages: usize,
}

#[derive(Debug, Deserialize)]
pub struct QuotesQuery {
    /// URL of the page to scrape
    pub url: String,
}

/// Build the HTTP router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/api/v1/quotes", post(get_quotes))
        .route("/api/v1/quotes/", post(get_quotes))
        .with_state(state)
}

async fn root() -> Json<Value> {
    Json(json!({ "message": "Hello World" }))
}

/// Always answers 200; failures are reported through `success: false`
async fn get_quotes(
    State(state): State<AppState>,
    Query(query): Query<QuotesQuery>,
) -> Json<QuotesResponse> {
    ::log::info!("Quote extraction requested for {}", query.url);

    match state.extractor.extract_quotes(&query.url, state.max_pages).await {
        Ok(quotes) => Json(QuotesResponse::success(quotes)),
        Err(e) => {
            ::log::error!("Quote extraction failed for {}: {}", query.url, e);
            Json(QuotesResponse::failure(e))
        }
    }
}

/// Build the extractor from `config` and serve until the process is stopped
pub async fn serve(config: &ScraperConfig) -> Result<()> {
    let extractor = QuoteExtractor::from_config(config)?;
    let state = AppState {
        extractor: Arc::new(extractor),
        max_pages: config.max_pages,
    };

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .map_err(|e| ScrapeError::Config(format!("cannot bind {}: {}", config.bind_addr, e)))?;
    ::log::info!("Listening on {}", config.bind_addr);

    axum::serve(listener, build_router(state))
        .await
        .map_err(|e| ScrapeError::Config(format!("server error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeFetcher, FakeRenderer, QuoteSiteModel, ScriptedModel, page_html};
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    const PAGE: &str = "http://quotes.test/page/1/";

    fn router(model: Arc<dyn crate::llm::LanguageModel>) -> Router {
        let html = page_html(&[0, 2], None);
        let config = ScraperConfig::default();
        let extractor = QuoteExtractor::new(
            Arc::new(FakeRenderer::new().with_page(PAGE, &html)),
            Arc::new(FakeFetcher::new().with_page(PAGE, &html)),
            model,
            &config,
        );
        build_router(AppState {
            extractor: Arc::new(extractor),
            max_pages: config.max_pages,
        })
    }

    async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn quotes_request(target: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(format!("/api/v1/quotes/?url={}", target))
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_root() {
        let request = Request::builder().uri("/").body(Body::empty()).unwrap();
        let (status, body) = send(router(Arc::new(QuoteSiteModel::new())), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Hello World");
    }

    #[tokio::test]
    async fn test_quotes_success() {
        let (status, body) = send(router(Arc::new(QuoteSiteModel::new())), quotes_request(PAGE)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["reviews_count"], 2);
        assert_eq!(body["data"]["reviews"][0]["author_name"], "Albert Einstein");
        assert_eq!(body["data"]["reviews"][1]["author_name"], "Steve Martin");
    }

    #[tokio::test]
    async fn test_quotes_failure_is_still_200() {
        let model = Arc::new(ScriptedModel::structured(|_| Ok("garbage".to_string())));
        let (status, body) = send(router(model), quotes_request(PAGE)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().contains("parse"));
    }

    #[tokio::test]
    async fn test_missing_url_is_rejected() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/quotes/")
            .body(Body::empty())
            .unwrap();
        let response = router(Arc::new(QuoteSiteModel::new()))
            .oneshot(request)
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
