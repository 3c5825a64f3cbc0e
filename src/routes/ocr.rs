use axum::{extract::State, response::Json, routing::get, Router};
use serde::Serialize;
use std::sync::Arc;
use tracing::warn;
use utoipa::ToSchema;

use crate::{
    ocr::{error::OcrDiagnostics, health::OcrHealthChecker},
    AppState,
};

#[derive(Serialize, ToSchema)]
pub struct OcrHealthResponse {
    pub status: String,
    pub ocr_feature_enabled: bool,
    pub tesseract_version: Option<String>,
    pub configured_language: String,
    pub language_available: bool,
}

#[derive(Serialize, ToSchema)]
pub struct AvailableLanguagesResponse {
    pub available_languages: Vec<LanguageInfo>,
    pub configured_language: String,
}

#[derive(Serialize, ToSchema)]
pub struct LanguageInfo {
    pub code: String,
    pub name: String,
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(ocr_health))
        .route("/languages", get(get_available_languages))
}

/// The checker shells out to `tesseract`, so it runs on the blocking pool.
async fn collect_diagnostics(state: &AppState) -> OcrDiagnostics {
    let checker = OcrHealthChecker::new(state.config.tessdata_path.clone());
    let language = state.config.ocr_language.clone();
    let fallback_language = language.clone();

    match tokio::task::spawn_blocking(move || checker.diagnostics(&language)).await {
        Ok(diagnostics) => diagnostics,
        Err(e) => {
            warn!("OCR diagnostics task failed: {}", e);
            OcrDiagnostics {
                tesseract_version: None,
                available_languages: Vec::new(),
                configured_language: fallback_language,
                tessdata_path: state.config.tessdata_path.clone(),
            }
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/ocr/health",
    tag = "ocr",
    responses(
        (status = 200, description = "OCR engine health status", body = OcrHealthResponse)
    )
)]
pub async fn ocr_health(State(state): State<Arc<AppState>>) -> Json<OcrHealthResponse> {
    let diagnostics = collect_diagnostics(&state).await;
    let ocr_feature_enabled = cfg!(feature = "ocr");
    let language_available = diagnostics.language_available();

    let healthy = ocr_feature_enabled && diagnostics.tesseract_version.is_some() && language_available;

    Json(OcrHealthResponse {
        status: if healthy { "healthy" } else { "unhealthy" }.to_string(),
        ocr_feature_enabled,
        tesseract_version: diagnostics.tesseract_version,
        configured_language: diagnostics.configured_language,
        language_available,
    })
}

#[utoipa::path(
    get,
    path = "/api/ocr/languages",
    tag = "ocr",
    responses(
        (status = 200, description = "Installed OCR languages", body = AvailableLanguagesResponse)
    )
)]
pub async fn get_available_languages(State(state): State<Arc<AppState>>) -> Json<AvailableLanguagesResponse> {
    let diagnostics = collect_diagnostics(&state).await;

    let available_languages = diagnostics
        .available_languages
        .into_iter()
        .map(|code| LanguageInfo {
            name: get_language_display_name(&code),
            code,
        })
        .collect();

    Json(AvailableLanguagesResponse {
        available_languages,
        configured_language: diagnostics.configured_language,
    })
}

/// Convert language codes to human-readable names
pub fn get_language_display_name(code: &str) -> String {
    match code {
        "eng" => "English",
        "spa" => "Spanish",
        "fra" => "French",
        "deu" => "German",
        "ita" => "Italian",
        "por" => "Portuguese",
        "rus" => "Russian",
        "jpn" => "Japanese",
        "chi_sim" => "Chinese (Simplified)",
        "chi_tra" => "Chinese (Traditional)",
        "kor" => "Korean",
        "ara" => "Arabic",
        "hin" => "Hindi",
        "nld" => "Dutch",
        "pol" => "Polish",
        "osd" => "Orientation and script detection",
        // Unknown codes are shown as-is
        _ => code,
    }
    .to_string()
}
