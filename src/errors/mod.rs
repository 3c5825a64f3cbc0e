use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

/// How loudly an error is logged when it reaches the HTTP boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorSeverity {
    /// A collaborator or the host failed; the request could not be served.
    Critical,
    /// The caller sent something we cannot work with.
    Minor,
    /// Normal outcome that happens to be reported through the error channel.
    Expected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCategory {
    /// Malformed or missing request fields
    Validation,
    /// Local OCR engine failures
    OcrProcessing,
    /// Cloud document-analysis failures
    DocumentAnalysis,
    /// Transient storage and other file system issues
    FileSystem,
}

/// Common trait for all custom error types in the application
pub trait AppError: std::error::Error + Send + Sync + 'static {
    /// Get the HTTP status code for this error
    fn status_code(&self) -> StatusCode;

    /// Message placed in the `error` field of the response body.
    /// Must never carry collaborator detail for server-side failures.
    fn user_message(&self) -> String;

    /// Stable code used in logs to tell failures apart
    fn error_code(&self) -> &'static str;

    fn error_category(&self) -> ErrorCategory;

    fn error_severity(&self) -> ErrorSeverity;
}

/// Macro to implement IntoResponse for all AppError types.
/// Responses are always `{"error": <user_message>}`; the technical detail only goes to the log.
macro_rules! impl_into_response {
    ($error_type:ty) => {
        impl axum::response::IntoResponse for $error_type {
            fn into_response(self) -> axum::response::Response {
                use crate::errors::{AppError, ErrorSeverity};
                use axum::response::Json;

                let status = self.status_code();
                match self.error_severity() {
                    ErrorSeverity::Critical => tracing::error!(
                        code = self.error_code(),
                        category = ?self.error_category(),
                        status = status.as_u16(),
                        "Request failed: {}", self
                    ),
                    ErrorSeverity::Minor => tracing::warn!(
                        code = self.error_code(),
                        status = status.as_u16(),
                        "Request rejected: {}", self
                    ),
                    ErrorSeverity::Expected => tracing::debug!(
                        code = self.error_code(),
                        "{}", self
                    ),
                }

                let body = Json(crate::models::ErrorResponse {
                    error: self.user_message(),
                });

                (status, body).into_response()
            }
        }
    };
}

pub(crate) use impl_into_response;

pub mod extraction;

pub use extraction::ExtractionError;
