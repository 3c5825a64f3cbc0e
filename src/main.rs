use std::sync::Arc;
use tracing::{info, warn};

use image_extract::{
    config::Config,
    document_analysis::{AzureLayoutAnalyzer, TableAnalyzer, UnconfiguredTableAnalyzer},
    ocr::{OcrService, OcrSettings},
    AppState,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| {
            tracing_subscriber::EnvFilter::new("info")
                .add_directive("image_extract=info".parse().unwrap())
        });

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .init();

    let config = Config::from_env()?;

    tokio::fs::create_dir_all(&config.temp_dir).await?;
    info!("Transient images are written to {}", config.temp_dir);

    // One engine for the whole process, shared read-only by every request
    let ocr_service = Arc::new(OcrService::new(OcrSettings::from_config(&config)));
    let preflight_service = ocr_service.clone();
    match tokio::task::spawn_blocking(move || preflight_service.preflight()).await? {
        Ok(diagnostics) => info!("{}", diagnostics),
        Err(e) if e.is_configuration_error() => warn!(
            code = e.error_code(),
            "OCR engine is not ready, text and figure extraction will fail: {}", e
        ),
        Err(e) => warn!(code = e.error_code(), "OCR preflight failed: {}", e),
    }
    info!(
        "OCR language '{}', timeout {}s",
        ocr_service.settings().language,
        ocr_service.settings().timeout_seconds
    );

    let table_analyzer: Arc<dyn TableAnalyzer> = match AzureLayoutAnalyzer::from_config(&config) {
        Some(analyzer) => {
            info!("Table extraction uses {}", analyzer.analyze_url());
            Arc::new(analyzer)
        }
        None => {
            warn!("AZURE_DOCUMENT_ENDPOINT/AZURE_DOCUMENT_KEY not set, table extraction is disabled");
            Arc::new(UnconfiguredTableAnalyzer)
        }
    };

    let state = Arc::new(AppState {
        config: config.clone(),
        text_recognizer: ocr_service.clone(),
        figure_detector: ocr_service,
        table_analyzer,
    });

    let app = image_extract::create_app(state);

    let listener = tokio::net::TcpListener::bind(&config.server_address).await?;
    info!("Server starting on {}", config.server_address);

    axum::serve(listener, app).await?;

    Ok(())
}
