//! Table extraction through the Azure Document Intelligence layout model.
//!
//! The service is asynchronous: the image is submitted with a POST that answers
//! `202 Accepted` and an `Operation-Location` header, which is then polled until
//! the analysis reaches a terminal status. No retries are attempted; any failure
//! fails the request.

pub mod error;

use async_trait::async_trait;
use reqwest::{header, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::models::{TableCell, TableStructure};

pub use error::DocumentAnalysisError;

const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";
const OPERATION_LOCATION_HEADER: &str = "Operation-Location";
const LAYOUT_MODEL: &str = "prebuilt-layout";

#[async_trait]
pub trait TableAnalyzer: Send + Sync {
    async fn analyze_tables(&self, image: &[u8]) -> Result<Vec<TableStructure>, DocumentAnalysisError>;
}

/// Used when no Azure credentials are configured; every call fails with
/// [`DocumentAnalysisError::NotConfigured`].
pub struct UnconfiguredTableAnalyzer;

#[async_trait]
impl TableAnalyzer for UnconfiguredTableAnalyzer {
    async fn analyze_tables(&self, _image: &[u8]) -> Result<Vec<TableStructure>, DocumentAnalysisError> {
        Err(DocumentAnalysisError::NotConfigured)
    }
}

#[derive(Debug, Clone)]
pub struct AzureLayoutAnalyzer {
    client: reqwest::Client,
    endpoint: String,
    key: String,
    api_version: String,
    poll_interval: Duration,
    max_polls: u32,
}

impl AzureLayoutAnalyzer {
    pub fn new(endpoint: &str, key: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            key: key.to_string(),
            api_version: "2023-07-31".to_string(),
            poll_interval: Duration::from_secs(1),
            max_polls: 60,
        }
    }

    /// Returns `None` when the endpoint or key is missing.
    pub fn from_config(config: &Config) -> Option<Self> {
        let (endpoint, key) = config.azure_credentials()?;
        Some(
            Self::new(endpoint, key)
                .with_api_version(&config.azure_api_version)
                .with_polling(
                    Duration::from_millis(config.azure_poll_interval_ms),
                    config.azure_max_polls,
                ),
        )
    }

    pub fn with_api_version(mut self, api_version: &str) -> Self {
        self.api_version = api_version.to_string();
        self
    }

    pub fn with_polling(mut self, interval: Duration, max_polls: u32) -> Self {
        self.poll_interval = interval;
        self.max_polls = max_polls.max(1);
        self
    }

    pub fn analyze_url(&self) -> String {
        format!(
            "{}/formrecognizer/documentModels/{}:analyze?api-version={}",
            self.endpoint, LAYOUT_MODEL, self.api_version
        )
    }

    async fn submit(&self, image: &[u8]) -> Result<String, DocumentAnalysisError> {
        let response = self
            .client
            .post(self.analyze_url())
            .header(SUBSCRIPTION_KEY_HEADER, &self.key)
            .header(header::CONTENT_TYPE, "application/octet-stream")
            .body(image.to_vec())
            .send()
            .await?;

        let response = check_status(response).await?;

        response
            .headers()
            .get(OPERATION_LOCATION_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string())
            .ok_or(DocumentAnalysisError::MissingOperationLocation)
    }

    async fn poll(&self, operation_url: &str) -> Result<AnalyzeResult, DocumentAnalysisError> {
        let mut last_status = String::from("notStarted");

        for attempt in 1..=self.max_polls {
            let response = self
                .client
                .get(operation_url)
                .header(SUBSCRIPTION_KEY_HEADER, &self.key)
                .send()
                .await?;

            let operation: AnalyzeOperation = check_status(response)
                .await?
                .json()
                .await
                .map_err(|e| DocumentAnalysisError::MalformedResponse {
                    details: e.to_string(),
                })?;

            debug!("Layout analysis poll {}: status {}", attempt, operation.status);

            match operation.status.as_str() {
                "succeeded" => {
                    return operation.analyze_result.ok_or_else(|| {
                        DocumentAnalysisError::MalformedResponse {
                            details: "succeeded without analyzeResult".to_string(),
                        }
                    });
                }
                "failed" | "canceled" => {
                    let details = operation
                        .error
                        .map(|e| e.describe())
                        .unwrap_or_else(|| format!("operation {}", operation.status));
                    return Err(DocumentAnalysisError::AnalysisFailed { details });
                }
                _ => {
                    last_status = operation.status;
                    tokio::time::sleep(self.poll_interval).await;
                }
            }
        }

        Err(DocumentAnalysisError::PollTimeout {
            attempts: self.max_polls,
            status: last_status,
        })
    }
}

#[async_trait]
impl TableAnalyzer for AzureLayoutAnalyzer {
    async fn analyze_tables(&self, image: &[u8]) -> Result<Vec<TableStructure>, DocumentAnalysisError> {
        info!("Submitting {} bytes for layout analysis", image.len());

        let operation_url = self.submit(image).await?;
        let result = self.poll(&operation_url).await?;
        let tables = into_table_structures(result);

        info!("Layout analysis returned {} tables", tables.len());
        Ok(tables)
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, DocumentAnalysisError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(DocumentAnalysisError::AuthenticationFailed {
            status: status.as_u16(),
        });
    }

    let body = response.text().await.unwrap_or_default();
    warn!("Layout analysis returned HTTP {}", status);
    Err(DocumentAnalysisError::Rejected {
        status: status.as_u16(),
        body: body.chars().take(512).collect(),
    })
}

fn into_table_structures(result: AnalyzeResult) -> Vec<TableStructure> {
    result
        .tables
        .into_iter()
        .zip(1u32..)
        .map(|(table, table_number)| TableStructure {
            table_number,
            row_count: table.row_count,
            column_count: table.column_count,
            cells: table
                .cells
                .into_iter()
                .map(|cell| TableCell {
                    row_index: cell.row_index,
                    column_index: cell.column_index,
                    content: cell.content,
                })
                .collect(),
        })
        .collect()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeOperation {
    status: String,
    analyze_result: Option<AnalyzeResult>,
    error: Option<ServiceError>,
}

#[derive(Debug, Deserialize)]
struct AnalyzeResult {
    #[serde(default)]
    tables: Vec<AnalyzedTable>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzedTable {
    row_count: u32,
    column_count: u32,
    #[serde(default)]
    cells: Vec<AnalyzedCell>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzedCell {
    row_index: u32,
    column_index: u32,
    #[serde(default)]
    content: String,
}

#[derive(Debug, Deserialize)]
struct ServiceError {
    code: Option<String>,
    message: Option<String>,
}

impl ServiceError {
    fn describe(&self) -> String {
        match (&self.code, &self.message) {
            (Some(code), Some(message)) => format!("{}: {}", code, message),
            (Some(code), None) => code.clone(),
            (None, Some(message)) => message.clone(),
            (None, None) => "unknown error".to_string(),
        }
    }
}
