use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OcrError {
    #[error("Tesseract is not installed on the system or the ocr feature is disabled")]
    TesseractNotInstalled,

    #[error("Tesseract language data not found for '{lang}'. Please install tesseract-ocr-{lang}")]
    LanguageDataNotFound { lang: String },

    #[error("Image too large for OCR. Max dimensions: {max_width}x{max_height}, Actual: {width}x{height}")]
    ImageTooLarge {
        width: u32,
        height: u32,
        max_width: u32,
        max_height: u32,
    },

    #[error("Invalid image format or corrupted image: {details}")]
    InvalidImageFormat { details: String },

    #[error("OCR timeout after {seconds} seconds. Consider reducing image size or quality")]
    OcrTimeout { seconds: u64 },

    #[error("Tesseract initialization failed: {details}")]
    InitializationFailed { details: String },

    #[error("Tesseract recognition failed: {details}")]
    RecognitionFailed { details: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl OcrError {
    /// True when the fault lies in the uploaded image rather than the host.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            OcrError::ImageTooLarge { .. } | OcrError::InvalidImageFormat { .. }
        )
    }

    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            OcrError::TesseractNotInstalled | OcrError::LanguageDataNotFound { .. }
        )
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            OcrError::TesseractNotInstalled => "OCR_NOT_INSTALLED",
            OcrError::LanguageDataNotFound { .. } => "OCR_LANG_MISSING",
            OcrError::ImageTooLarge { .. } => "OCR_IMAGE_TOO_LARGE",
            OcrError::InvalidImageFormat { .. } => "OCR_INVALID_FORMAT",
            OcrError::OcrTimeout { .. } => "OCR_TIMEOUT",
            OcrError::InitializationFailed { .. } => "OCR_INIT_FAILED",
            OcrError::RecognitionFailed { .. } => "OCR_RECOGNITION_FAILED",
            OcrError::Io(_) => "OCR_IO_ERROR",
            OcrError::Other(_) => "OCR_UNKNOWN_ERROR",
        }
    }
}

#[derive(Debug, Clone)]
pub struct OcrDiagnostics {
    pub tesseract_version: Option<String>,
    pub available_languages: Vec<String>,
    pub configured_language: String,
    pub tessdata_path: Option<String>,
}

impl OcrDiagnostics {
    pub fn language_available(&self) -> bool {
        self.configured_language
            .split('+')
            .all(|lang| self.available_languages.iter().any(|l| l == lang.trim()))
    }
}

impl fmt::Display for OcrDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "OCR Diagnostics:")?;
        writeln!(f, "  Tesseract Version: {}", self.tesseract_version.as_deref().unwrap_or("Not installed"))?;
        writeln!(f, "  Tessdata Path: {}", self.tessdata_path.as_deref().unwrap_or("Not set"))?;
        writeln!(f, "  Configured Language: {}", self.configured_language)?;
        writeln!(f, "  Available Languages: {}", self.available_languages.join(", "))?;
        Ok(())
    }
}
