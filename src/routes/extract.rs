use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, State,
    },
    http::StatusCode,
    response::Json,
    routing::post,
    Router,
};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::{
    errors::ExtractionError,
    figures::{build_result, extract_figures},
    ingest::{ingest, ImageUpload},
    models::{ExtractionResponse, ExtractionType},
    AppState,
};

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/extract", post(extract_data))
}

/// Fields of the `/extract` multipart form.
#[derive(Debug, Default)]
pub struct ExtractForm {
    pub extraction_type: Option<String>,
    pub image: Option<ImageUpload>,
}

impl ExtractForm {
    /// Collect the form fields. The first occurrence of each field wins, and an
    /// `image` part without a filename is not treated as a file.
    pub async fn from_multipart(mut multipart: Multipart, limit_mb: u64) -> Result<Self, ExtractionError> {
        let mut form = ExtractForm::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| multipart_error(e, limit_mb))?
        {
            let name = field.name().unwrap_or("").to_string();

            match name.as_str() {
                "extraction_type" => {
                    let value = field.text().await.map_err(|e| multipart_error(e, limit_mb))?;
                    if form.extraction_type.is_none() {
                        form.extraction_type = Some(value);
                    }
                }
                "image" => {
                    let Some(filename) = field.file_name().map(str::to_string) else {
                        debug!("Ignoring 'image' field without a filename");
                        continue;
                    };
                    let content_type = field.content_type().map(str::to_string);
                    let data = field.bytes().await.map_err(|e| multipart_error(e, limit_mb))?;

                    if form.image.is_none() {
                        debug!("Received image '{}' ({} bytes)", filename, data.len());
                        form.image = Some(ImageUpload {
                            filename,
                            content_type,
                            data,
                        });
                    }
                }
                other => debug!("Ignoring multipart field '{}'", other),
            }
        }

        Ok(form)
    }
}

fn multipart_error(error: MultipartError, limit_mb: u64) -> ExtractionError {
    if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ExtractionError::PayloadTooLarge { limit_mb }
    } else {
        ExtractionError::MalformedRequest {
            details: error.body_text(),
        }
    }
}

/// Accepts only a non-empty run of ASCII digits naming a known extraction type.
pub fn parse_extraction_type(raw: Option<&str>) -> Result<ExtractionType, ExtractionError> {
    let raw = raw.ok_or(ExtractionError::MissingExtractionType)?;

    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ExtractionError::InvalidExtractionType {
            value: raw.to_string(),
        });
    }

    raw.parse::<u64>()
        .ok()
        .and_then(ExtractionType::from_code)
        .ok_or_else(|| ExtractionError::UnsupportedExtractionType {
            value: raw.to_string(),
        })
}

/// Extract text, tables or summed figures from an uploaded image
#[utoipa::path(
    post,
    path = "/extract",
    tag = "extraction",
    request_body(
        content = String,
        description = "Multipart form with `extraction_type` (1 = text, 2 = tables, 3 = figure sum) and an `image` file",
        content_type = "multipart/form-data"
    ),
    responses(
        (status = 200, description = "`{\"text\"}`, `{\"tables\"}` or `{\"formula\", \"result\"}`; `{\"error\"}` when no figures were found", body = serde_json::Value),
        (status = 400, description = "Missing or invalid form fields", body = crate::models::ErrorResponse),
        (status = 413, description = "Upload too large", body = crate::models::ErrorResponse),
        (status = 500, description = "Internal Server Error", body = crate::models::ErrorResponse)
    )
)]
pub async fn extract_data(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ExtractionResponse>, ExtractionError> {
    let form = match multipart {
        Ok(multipart) => ExtractForm::from_multipart(multipart, state.config.max_file_size_mb).await?,
        Err(rejection) => {
            // Treated like an empty form, so the caller learns which field is missing
            warn!("Request body is not multipart form data: {}", rejection.body_text());
            ExtractForm::default()
        }
    };

    let extraction_type = parse_extraction_type(form.extraction_type.as_deref())?;
    info!(extraction_type = extraction_type.code(), "Processing extraction request");

    let response = match extraction_type {
        ExtractionType::Text => extract_text(&state, &form).await?,
        ExtractionType::Tables => extract_tables(&state, &form).await?,
        ExtractionType::FigureSum => sum_figures(&state, &form).await?,
    };

    Ok(Json(response))
}

async fn extract_text(state: &AppState, form: &ExtractForm) -> Result<ExtractionResponse, ExtractionError> {
    let image = form.image.as_ref().ok_or(ExtractionError::MissingImage)?;
    let text = state.text_recognizer.recognize_text(&image.data).await?;

    Ok(ExtractionResponse::Text { text })
}

async fn extract_tables(state: &AppState, form: &ExtractForm) -> Result<ExtractionResponse, ExtractionError> {
    let image = form.image.as_ref().ok_or(ExtractionError::MissingImage)?;
    let tables = state.table_analyzer.analyze_tables(&image.data).await?;

    Ok(ExtractionResponse::Tables { tables })
}

async fn sum_figures(state: &AppState, form: &ExtractForm) -> Result<ExtractionResponse, ExtractionError> {
    let upload = form.image.as_ref();
    if upload.is_some_and(|image| !image.has_filename()) {
        return Err(ExtractionError::EmptyFilename);
    }

    let transient = ingest(Path::new(&state.config.temp_dir), upload).await?;
    let detection = state.figure_detector.detect_fragments(transient.path()).await;
    transient.remove().await;
    let fragments = detection?;

    let figures = extract_figures(&fragments);
    debug!("Found {} figures in {} fragments", figures.len(), fragments.len());

    let result = build_result(&figures)?;
    info!("Summed {} figures: {}", figures.len(), result.result);

    Ok(ExtractionResponse::Figures(result))
}
