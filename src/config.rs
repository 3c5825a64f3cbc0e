use anyhow::{bail, Result};
use std::env;

#[derive(Clone, Debug)]
pub struct Config {
    pub server_address: String,
    pub temp_dir: String,
    pub max_file_size_mb: u64,
    pub ocr_language: String,
    pub tessdata_path: Option<String>,
    pub ocr_timeout_seconds: u64,
    pub ocr_max_image_width: u32,
    pub ocr_max_image_height: u32,
    pub azure_endpoint: Option<String>,
    pub azure_key: Option<String>,
    pub azure_api_version: String,
    pub azure_poll_interval_ms: u64,
    pub azure_max_polls: u32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server_address: "0.0.0.0:8000".to_string(),
            temp_dir: env::temp_dir().to_string_lossy().into_owned(),
            max_file_size_mb: 50,
            ocr_language: "eng".to_string(),
            tessdata_path: None,
            ocr_timeout_seconds: 120,
            ocr_max_image_width: 10000,
            ocr_max_image_height: 10000,
            azure_endpoint: None,
            azure_key: None,
            azure_api_version: "2023-07-31".to_string(),
            azure_poll_interval_ms: 1000,
            azure_max_polls: 60,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let defaults = Config::default();
        let config = Config {
            server_address: env::var("SERVER_ADDRESS")
                .unwrap_or(defaults.server_address),
            temp_dir: env::var("TEMP_DIR")
                .unwrap_or(defaults.temp_dir),
            max_file_size_mb: parsed_var("MAX_FILE_SIZE_MB")
                .unwrap_or(defaults.max_file_size_mb),
            ocr_language: env::var("OCR_LANGUAGE")
                .map(|s| s.trim().to_string())
                .unwrap_or(defaults.ocr_language),
            tessdata_path: non_empty_var("TESSDATA_PREFIX"),
            ocr_timeout_seconds: parsed_var("OCR_TIMEOUT_SECONDS")
                .unwrap_or(defaults.ocr_timeout_seconds),
            ocr_max_image_width: parsed_var("OCR_MAX_IMAGE_WIDTH")
                .unwrap_or(defaults.ocr_max_image_width),
            ocr_max_image_height: parsed_var("OCR_MAX_IMAGE_HEIGHT")
                .unwrap_or(defaults.ocr_max_image_height),
            azure_endpoint: non_empty_var("AZURE_DOCUMENT_ENDPOINT")
                .map(|s| s.trim_end_matches('/').to_string()),
            azure_key: non_empty_var("AZURE_DOCUMENT_KEY"),
            azure_api_version: env::var("AZURE_DOCUMENT_API_VERSION")
                .unwrap_or(defaults.azure_api_version),
            azure_poll_interval_ms: parsed_var("AZURE_POLL_INTERVAL_MS")
                .unwrap_or(defaults.azure_poll_interval_ms),
            azure_max_polls: parsed_var("AZURE_MAX_POLLS")
                .unwrap_or(defaults.azure_max_polls),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.ocr_language.is_empty() {
            bail!("OCR_LANGUAGE must not be empty");
        }
        if self.max_file_size_mb == 0 {
            bail!("MAX_FILE_SIZE_MB must be greater than zero");
        }
        if self.ocr_timeout_seconds == 0 {
            bail!("OCR_TIMEOUT_SECONDS must be greater than zero");
        }
        if self.azure_max_polls == 0 {
            bail!("AZURE_MAX_POLLS must be greater than zero");
        }
        Ok(())
    }

    /// Azure credentials are only usable as a pair.
    pub fn azure_credentials(&self) -> Option<(&str, &str)> {
        match (&self.azure_endpoint, &self.azure_key) {
            (Some(endpoint), Some(key)) => Some((endpoint.as_str(), key.as_str())),
            _ => None,
        }
    }

    pub fn max_upload_bytes(&self) -> usize {
        (self.max_file_size_mb as usize).saturating_mul(1024 * 1024)
    }
}

fn parsed_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|s| s.trim().parse().ok())
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|s| !s.trim().is_empty())
}
