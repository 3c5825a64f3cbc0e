use axum::{response::Json, routing::get, Router};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::{
    models::{ErrorResponse, ExtractionResult, TableCell, TableStructure},
    routes::ocr::{AvailableLanguagesResponse, LanguageInfo, OcrHealthResponse},
    AppState,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::extract::extract_data,
        crate::routes::ocr::ocr_health,
        crate::routes::ocr::get_available_languages,
        crate::health_check,
    ),
    components(
        schemas(
            ExtractionResult, TableStructure, TableCell, ErrorResponse,
            OcrHealthResponse, AvailableLanguagesResponse, LanguageInfo
        )
    ),
    tags(
        (name = "extraction", description = "Image text, table and figure extraction"),
        (name = "ocr", description = "OCR engine diagnostics"),
        (name = "health", description = "Service health"),
    ),
    info(
        title = "Image Extract API",
        version = "0.1.0",
        description = "OCR text, table and figure-sum extraction from uploaded images"
    )
)]
pub struct ApiDoc;

pub fn create_openapi_router() -> Router<Arc<AppState>> {
    Router::new().route("/api-docs/openapi.json", get(openapi_json))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
