use axum::http::StatusCode;
use thiserror::Error;

use super::{AppError, ErrorCategory, ErrorSeverity};
use crate::document_analysis::DocumentAnalysisError;
use crate::ocr::error::OcrError;

const INTERNAL_SERVER_ERROR: &str = "Internal Server Error";

/// Everything that can end an `/extract` request early.
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("Extraction type not provided")]
    MissingExtractionType,

    #[error("Extraction type '{value}' is not an integer")]
    InvalidExtractionType { value: String },

    #[error("Extraction type {value} is not supported")]
    UnsupportedExtractionType { value: String },

    #[error("No image file in the request")]
    MissingImage,

    #[error("Image part has an empty filename")]
    EmptyFilename,

    #[error("Malformed multipart request: {details}")]
    MalformedRequest { details: String },

    #[error("Upload exceeds the {limit_mb} MB limit")]
    PayloadTooLarge { limit_mb: u64 },

    #[error("No figures found in the image")]
    NoFiguresFound,

    #[error("OCR failed: {0}")]
    Ocr(#[from] OcrError),

    #[error("Table extraction failed: {0}")]
    DocumentAnalysis(#[from] DocumentAnalysisError),

    #[error("Transient image storage failed: {0}")]
    Storage(#[from] std::io::Error),
}

impl AppError for ExtractionError {
    fn status_code(&self) -> StatusCode {
        match self {
            ExtractionError::MissingExtractionType
            | ExtractionError::InvalidExtractionType { .. }
            | ExtractionError::UnsupportedExtractionType { .. }
            | ExtractionError::MissingImage
            | ExtractionError::EmptyFilename
            | ExtractionError::MalformedRequest { .. } => StatusCode::BAD_REQUEST,
            ExtractionError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            // Kept as 200 for compatibility with existing clients
            ExtractionError::NoFiguresFound => StatusCode::OK,
            ExtractionError::Ocr(_)
            | ExtractionError::DocumentAnalysis(_)
            | ExtractionError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn user_message(&self) -> String {
        match self {
            ExtractionError::MissingExtractionType => "Extraction type not provided".to_string(),
            ExtractionError::InvalidExtractionType { .. } => "Extraction type should be an integer".to_string(),
            ExtractionError::UnsupportedExtractionType { .. } => "Unsupported extraction type".to_string(),
            ExtractionError::MissingImage => "No file provided".to_string(),
            ExtractionError::EmptyFilename => "No selected file".to_string(),
            ExtractionError::MalformedRequest { .. } => "Malformed multipart request".to_string(),
            ExtractionError::PayloadTooLarge { limit_mb } => format!("File too large (max {} MB)", limit_mb),
            ExtractionError::NoFiguresFound => "No figures found in the image".to_string(),
            ExtractionError::Ocr(_)
            | ExtractionError::DocumentAnalysis(_)
            | ExtractionError::Storage(_) => INTERNAL_SERVER_ERROR.to_string(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            ExtractionError::MissingExtractionType => "EXTRACTION_TYPE_MISSING",
            ExtractionError::InvalidExtractionType { .. } => "EXTRACTION_TYPE_NOT_INTEGER",
            ExtractionError::UnsupportedExtractionType { .. } => "EXTRACTION_TYPE_UNSUPPORTED",
            ExtractionError::MissingImage => "IMAGE_MISSING",
            ExtractionError::EmptyFilename => "IMAGE_FILENAME_EMPTY",
            ExtractionError::MalformedRequest { .. } => "MALFORMED_MULTIPART",
            ExtractionError::PayloadTooLarge { .. } => "PAYLOAD_TOO_LARGE",
            ExtractionError::NoFiguresFound => "NO_FIGURES_FOUND",
            ExtractionError::Ocr(e) => e.error_code(),
            ExtractionError::DocumentAnalysis(e) => e.error_code(),
            ExtractionError::Storage(_) => "TRANSIENT_STORAGE_FAILED",
        }
    }

    fn error_category(&self) -> ErrorCategory {
        match self {
            ExtractionError::Ocr(_) => ErrorCategory::OcrProcessing,
            ExtractionError::DocumentAnalysis(_) => ErrorCategory::DocumentAnalysis,
            ExtractionError::Storage(_) => ErrorCategory::FileSystem,
            _ => ErrorCategory::Validation,
        }
    }

    fn error_severity(&self) -> ErrorSeverity {
        if let ExtractionError::Ocr(e) = self {
            if e.is_input_error() {
                return ErrorSeverity::Minor;
            }
        }
        match self.status_code() {
            StatusCode::INTERNAL_SERVER_ERROR => ErrorSeverity::Critical,
            StatusCode::OK => ErrorSeverity::Expected,
            _ => ErrorSeverity::Minor,
        }
    }
}

impl_into_response!(ExtractionError);
