//! Test doubles for the OCR and document-analysis collaborators, plus helpers
//! for driving the router with multipart requests.

use async_trait::async_trait;
use axum::{body::Body, http::Request, Router};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tower::util::ServiceExt;

use crate::{
    config::Config,
    document_analysis::{DocumentAnalysisError, TableAnalyzer},
    models::{RecognizedFragment, TableCell, TableStructure},
    ocr::{error::OcrError, FigureDetector, TextRecognizer},
    AppState,
};

/// Returns a preset string for every image.
pub struct StaticTextRecognizer {
    pub text: String,
}

impl StaticTextRecognizer {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[async_trait]
impl TextRecognizer for StaticTextRecognizer {
    async fn recognize_text(&self, _image: &[u8]) -> Result<String, OcrError> {
        Ok(self.text.clone())
    }
}

/// What a [`RecordingFigureDetector`] saw for one call.
#[derive(Debug, Clone)]
pub struct DetectionRecord {
    pub path: PathBuf,
    pub existed_during_detection: bool,
    pub bytes: Vec<u8>,
}

/// Returns preset fragments (or a failure) and records the image path it was given,
/// so tests can check the transient file lifecycle.
pub struct RecordingFigureDetector {
    fragments: Vec<RecognizedFragment>,
    fail_with: Option<fn() -> OcrError>,
    calls: Mutex<Vec<DetectionRecord>>,
}

impl RecordingFigureDetector {
    pub fn with_texts(texts: &[&str]) -> Self {
        Self {
            fragments: texts.iter().map(|t| RecognizedFragment::new(*t, 0.9)).collect(),
            fail_with: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: fn() -> OcrError) -> Self {
        Self {
            fragments: Vec::new(),
            fail_with: Some(error),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<DetectionRecord> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl FigureDetector for RecordingFigureDetector {
    async fn detect_fragments(&self, image_path: &Path) -> Result<Vec<RecognizedFragment>, OcrError> {
        let bytes = tokio::fs::read(image_path).await.unwrap_or_default();
        let record = DetectionRecord {
            path: image_path.to_path_buf(),
            existed_during_detection: image_path.exists(),
            bytes,
        };
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(record);
        }

        match self.fail_with {
            Some(error) => Err(error()),
            None => Ok(self.fragments.clone()),
        }
    }
}

/// Returns preset tables, or fails like an unconfigured service.
pub struct StaticTableAnalyzer {
    tables: Option<Vec<TableStructure>>,
}

impl StaticTableAnalyzer {
    pub fn new(tables: Vec<TableStructure>) -> Self {
        Self { tables: Some(tables) }
    }

    pub fn unavailable() -> Self {
        Self { tables: None }
    }
}

#[async_trait]
impl TableAnalyzer for StaticTableAnalyzer {
    async fn analyze_tables(&self, _image: &[u8]) -> Result<Vec<TableStructure>, DocumentAnalysisError> {
        self.tables.clone().ok_or(DocumentAnalysisError::NotConfigured)
    }
}

/// A single 2x2 table used by the table-extraction tests.
pub fn sample_table() -> TableStructure {
    let cell = |row_index: u32, column_index: u32, content: &str| TableCell {
        row_index,
        column_index,
        content: content.to_string(),
    };
    TableStructure {
        table_number: 1,
        row_count: 2,
        column_count: 2,
        cells: vec![
            cell(0, 0, "Item"),
            cell(0, 1, "Amount"),
            cell(1, 0, "Coffee"),
            cell(1, 1, "4.50"),
        ],
    }
}

pub fn test_config(temp_dir: &Path) -> Config {
    Config {
        temp_dir: temp_dir.to_string_lossy().into_owned(),
        max_file_size_mb: 1,
        ..Config::default()
    }
}

pub fn create_test_app(
    temp_dir: &Path,
    figure_detector: Arc<RecordingFigureDetector>,
    table_analyzer: StaticTableAnalyzer,
) -> Router {
    let state = AppState {
        config: test_config(temp_dir),
        text_recognizer: Arc::new(StaticTextRecognizer::new("Invoice 42\nTotal due")),
        figure_detector,
        table_analyzer: Arc::new(table_analyzer),
    };
    crate::create_app(Arc::new(state))
}

/// Minimal multipart/form-data encoder.
pub struct MultipartBuilder {
    boundary: String,
    body: Vec<u8>,
}

impl Default for MultipartBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MultipartBuilder {
    pub fn new() -> Self {
        Self {
            boundary: format!("----image-extract-{}", uuid::Uuid::new_v4().simple()),
            body: Vec::new(),
        }
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(format!("--{}\r\n", self.boundary).as_bytes());
        self.body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
        );
        self.body.extend_from_slice(value.as_bytes());
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub fn file(mut self, name: &str, filename: &str, content_type: &str, data: &[u8]) -> Self {
        self.body.extend_from_slice(format!("--{}\r\n", self.boundary).as_bytes());
        self.body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                name, filename, content_type
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(data);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    pub fn into_request(mut self, uri: &str) -> Request<Body> {
        self.body.extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", self.content_type())
            .body(Body::from(self.body))
            .unwrap()
    }
}

/// PNG signature followed by filler; enough for format sniffing, never decoded.
pub fn fake_png() -> Vec<u8> {
    let mut data = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    data.extend_from_slice(&[0u8; 24]);
    data
}

/// Send a request and return the status with the JSON body.
pub async fn send_json(app: Router, request: Request<Body>) -> (axum::http::StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}
