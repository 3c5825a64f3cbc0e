use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocumentAnalysisError {
    #[error("Document analysis is not configured. Set AZURE_DOCUMENT_ENDPOINT and AZURE_DOCUMENT_KEY")]
    NotConfigured,

    #[error("Document analysis service rejected the credentials (HTTP {status})")]
    AuthenticationFailed { status: u16 },

    #[error("Document analysis request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Document analysis service returned HTTP {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("Document analysis response did not include an Operation-Location header")]
    MissingOperationLocation,

    #[error("Document analysis failed: {details}")]
    AnalysisFailed { details: String },

    #[error("Document analysis still '{status}' after {attempts} polls")]
    PollTimeout { attempts: u32, status: String },

    #[error("Malformed document analysis response: {details}")]
    MalformedResponse { details: String },
}

impl DocumentAnalysisError {
    pub fn error_code(&self) -> &'static str {
        match self {
            DocumentAnalysisError::NotConfigured => "ANALYSIS_NOT_CONFIGURED",
            DocumentAnalysisError::AuthenticationFailed { .. } => "ANALYSIS_AUTH_FAILED",
            DocumentAnalysisError::Network(_) => "ANALYSIS_NETWORK_ERROR",
            DocumentAnalysisError::Rejected { .. } => "ANALYSIS_REJECTED",
            DocumentAnalysisError::MissingOperationLocation => "ANALYSIS_NO_OPERATION",
            DocumentAnalysisError::AnalysisFailed { .. } => "ANALYSIS_FAILED",
            DocumentAnalysisError::PollTimeout { .. } => "ANALYSIS_POLL_TIMEOUT",
            DocumentAnalysisError::MalformedResponse { .. } => "ANALYSIS_MALFORMED_RESPONSE",
        }
    }
}
