pub mod config;
pub mod document_analysis;
pub mod errors;
pub mod figures;
pub mod ingest;
pub mod models;
pub mod ocr;
pub mod routes;
pub mod swagger;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

#[cfg(test)]
mod tests;

use axum::{extract::DefaultBodyLimit, routing::get, Json, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use config::Config;
use document_analysis::TableAnalyzer;
use ocr::{FigureDetector, TextRecognizer};

/// Shared, read-only request context. Collaborators are constructed once at startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub text_recognizer: Arc<dyn TextRecognizer>,
    pub figure_detector: Arc<dyn FigureDetector>,
    pub table_analyzer: Arc<dyn TableAnalyzer>,
}

/// Health check endpoint for monitoring
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is up", body = serde_json::Value)
    )
)]
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Full HTTP surface with state, upload limit and CORS applied.
pub fn create_app(state: Arc<AppState>) -> Router {
    let body_limit = state.config.max_upload_bytes();

    Router::new()
        .route("/api/health", get(health_check))
        .merge(routes::extract::router())
        .nest("/api/ocr", routes::ocr::router())
        .merge(swagger::create_openapi_router())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
