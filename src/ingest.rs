use axum::body::Bytes;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::errors::ExtractionError;

const DEFAULT_EXTENSION: &str = "png";

/// An uploaded `image` file part.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub filename: String,
    pub content_type: Option<String>,
    pub data: Bytes,
}

impl ImageUpload {
    pub fn new(filename: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            filename: filename.into(),
            content_type: None,
            data: data.into(),
        }
    }

    pub fn has_filename(&self) -> bool {
        !self.filename.is_empty()
    }

    /// Extension for the transient copy: sniffed from the bytes first, then
    /// taken from the client filename, then the default.
    pub fn extension(&self) -> String {
        if let Some(kind) = infer::get(&self.data) {
            return kind.extension().to_string();
        }

        Path::new(&self.filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .filter(|ext| !ext.is_empty() && ext.len() <= 8 && ext.chars().all(|c| c.is_ascii_alphanumeric()))
            .unwrap_or_else(|| DEFAULT_EXTENSION.to_string())
    }
}

/// Request-scoped copy of an upload on disk. Call [`TransientImage::remove`] when
/// done; dropping it also removes the file.
#[derive(Debug)]
pub struct TransientImage {
    path: PathBuf,
}

impl TransientImage {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the file without blocking the runtime. A file that is already
    /// gone is not an error.
    pub async fn remove(mut self) {
        let path = std::mem::take(&mut self.path);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => debug!("Removed transient image {:?}", path),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to remove transient image {:?}: {}", path, e),
        }
    }
}

/// Fallback for a request future that is dropped before [`TransientImage::remove`] runs.
impl Drop for TransientImage {
    fn drop(&mut self) {
        if self.path.as_os_str().is_empty() {
            return;
        }
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!("Removed transient image {:?}", self.path),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to remove transient image {:?}: {}", self.path, e),
        }
    }
}

/// Persist an upload under a unique name in `temp_dir`.
///
/// `None` means the request carried no image and yields [`ExtractionError::MissingImage`].
pub async fn ingest(temp_dir: &Path, upload: Option<&ImageUpload>) -> Result<TransientImage, ExtractionError> {
    let upload = upload.ok_or(ExtractionError::MissingImage)?;

    tokio::fs::create_dir_all(temp_dir).await?;

    let path = temp_dir.join(format!("figures_{}.{}", Uuid::new_v4(), upload.extension()));
    // Owned before the write so a partial file is still cleaned up
    let transient = TransientImage { path };
    tokio::fs::write(transient.path(), &upload.data).await?;

    debug!("Stored {} byte upload at {:?}", upload.data.len(), transient.path());
    Ok(transient)
}
