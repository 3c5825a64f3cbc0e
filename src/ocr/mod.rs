pub mod error;
pub mod health;
pub mod tsv;

#[cfg(test)]
mod tests;

use anyhow::anyhow;
use async_trait::async_trait;
use std::path::Path;
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tracing::{debug, info};

use crate::config::Config;
use crate::models::RecognizedFragment;
use crate::ocr::error::{OcrDiagnostics, OcrError};
use crate::ocr::health::OcrHealthChecker;

#[cfg(feature = "ocr")]
use tesseract::Tesseract;

/// Plain OCR: image bytes in, recognised text out.
#[async_trait]
pub trait TextRecognizer: Send + Sync {
    async fn recognize_text(&self, image: &[u8]) -> Result<String, OcrError>;
}

/// Line-level OCR with confidences, reading the image from disk.
#[async_trait]
pub trait FigureDetector: Send + Sync {
    async fn detect_fragments(&self, image_path: &Path) -> Result<Vec<RecognizedFragment>, OcrError>;
}

#[derive(Debug, Clone)]
pub struct OcrSettings {
    pub language: String,
    pub tessdata_path: Option<String>,
    pub timeout_seconds: u64,
    pub max_image_width: u32,
    pub max_image_height: u32,
}

impl OcrSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            language: config.ocr_language.clone(),
            tessdata_path: config.tessdata_path.clone(),
            timeout_seconds: config.ocr_timeout_seconds,
            max_image_width: config.ocr_max_image_width,
            max_image_height: config.ocr_max_image_height,
        }
    }
}

/// Process-wide OCR engine.
///
/// Built once at startup and shared behind an `Arc`. It only holds immutable
/// settings: every call creates its own Tesseract handle on the blocking pool,
/// so concurrent requests never share engine state.
pub struct OcrService {
    settings: OcrSettings,
    health_checker: OcrHealthChecker,
}

impl OcrService {
    pub fn new(settings: OcrSettings) -> Self {
        let health_checker = OcrHealthChecker::new(settings.tessdata_path.clone());
        Self {
            settings,
            health_checker,
        }
    }

    pub fn settings(&self) -> &OcrSettings {
        &self.settings
    }

    /// Startup check: the engine is installed and the configured languages exist.
    pub fn preflight(&self) -> Result<OcrDiagnostics, OcrError> {
        if !cfg!(feature = "ocr") {
            return Err(OcrError::TesseractNotInstalled);
        }
        self.health_checker.check_tesseract_installation()?;
        self.health_checker.validate_language_combination(&self.settings.language)?;
        Ok(self.health_checker.diagnostics(&self.settings.language))
    }

    async fn run_blocking<T, F>(&self, operation: &'static str, task: F) -> Result<T, OcrError>
    where
        T: Send + 'static,
        F: FnOnce(OcrSettings) -> Result<T, OcrError> + Send + 'static,
    {
        let settings = self.settings.clone();
        let seconds = settings.timeout_seconds;
        let start_time = Instant::now();

        let handle = tokio::task::spawn_blocking(move || task(settings));

        let result = match timeout(Duration::from_secs(seconds), handle).await {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => Err(OcrError::Other(anyhow!("OCR task failed: {}", e))),
            Err(_) => Err(OcrError::OcrTimeout { seconds }),
        };

        debug!("{} finished in {:?} (ok: {})", operation, start_time.elapsed(), result.is_ok());
        result
    }
}

#[async_trait]
impl TextRecognizer for OcrService {
    async fn recognize_text(&self, image: &[u8]) -> Result<String, OcrError> {
        let image = image.to_vec();
        let text = self
            .run_blocking("text recognition", move |settings| {
                recognize_text_blocking(&settings, &image)
            })
            .await?;

        info!("Plain OCR extracted {} characters", text.len());
        Ok(text)
    }
}

#[async_trait]
impl FigureDetector for OcrService {
    async fn detect_fragments(&self, image_path: &Path) -> Result<Vec<RecognizedFragment>, OcrError> {
        let image_path = image_path
            .to_str()
            .ok_or_else(|| OcrError::InvalidImageFormat {
                details: format!("Image path is not valid UTF-8: {}", image_path.display()),
            })?
            .to_string();

        let fragments = self
            .run_blocking("figure detection", move |settings| {
                detect_fragments_blocking(&settings, &image_path)
            })
            .await?;

        info!("Figure detection recognised {} text fragments", fragments.len());
        Ok(fragments)
    }
}

#[cfg(feature = "ocr")]
fn check_dimensions(
    settings: &OcrSettings,
    dimensions: image::ImageResult<(u32, u32)>,
) -> Result<(), OcrError> {
    let (width, height) = dimensions.map_err(|e| OcrError::InvalidImageFormat {
        details: e.to_string(),
    })?;

    if width > settings.max_image_width || height > settings.max_image_height {
        return Err(OcrError::ImageTooLarge {
            width,
            height,
            max_width: settings.max_image_width,
            max_height: settings.max_image_height,
        });
    }

    Ok(())
}

#[cfg(feature = "ocr")]
fn new_tesseract(settings: &OcrSettings) -> Result<Tesseract, OcrError> {
    Tesseract::new(settings.tessdata_path.as_deref(), Some(settings.language.as_str())).map_err(|e| {
        OcrError::InitializationFailed {
            details: e.to_string(),
        }
    })
}

#[cfg(feature = "ocr")]
fn recognize_text_blocking(settings: &OcrSettings, image: &[u8]) -> Result<String, OcrError> {
    let reader = image::ImageReader::new(std::io::Cursor::new(image)).with_guessed_format()?;
    check_dimensions(settings, reader.into_dimensions())?;

    let mut tesseract = new_tesseract(settings)?
        .set_image_from_mem(image)
        .map_err(|e| OcrError::InvalidImageFormat {
            details: e.to_string(),
        })?
        .recognize()
        .map_err(|e| OcrError::RecognitionFailed {
            details: e.to_string(),
        })?;

    let text = tesseract.get_text().map_err(|e| OcrError::RecognitionFailed {
        details: format!("Failed to extract text: {}", e),
    })?;

    Ok(text.trim().to_string())
}

#[cfg(feature = "ocr")]
fn detect_fragments_blocking(
    settings: &OcrSettings,
    image_path: &str,
) -> Result<Vec<RecognizedFragment>, OcrError> {
    let reader = image::ImageReader::open(image_path)?.with_guessed_format()?;
    check_dimensions(settings, reader.into_dimensions())?;

    let mut tesseract = new_tesseract(settings)?
        .set_image(image_path)
        .map_err(|e| OcrError::InvalidImageFormat {
            details: e.to_string(),
        })?
        .recognize()
        .map_err(|e| OcrError::RecognitionFailed {
            details: e.to_string(),
        })?;

    let tsv = tesseract.get_tsv_text(0).map_err(|e| OcrError::RecognitionFailed {
        details: format!("Failed to read TSV output: {}", e),
    })?;

    Ok(tsv::fragments_from_tsv(&tsv))
}

#[cfg(not(feature = "ocr"))]
fn recognize_text_blocking(_settings: &OcrSettings, _image: &[u8]) -> Result<String, OcrError> {
    Err(OcrError::TesseractNotInstalled)
}

#[cfg(not(feature = "ocr"))]
fn detect_fragments_blocking(
    _settings: &OcrSettings,
    _image_path: &str,
) -> Result<Vec<RecognizedFragment>, OcrError> {
    Err(OcrError::TesseractNotInstalled)
}
