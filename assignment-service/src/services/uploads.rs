//! Temporary storage for uploaded files.

use crate::models::UploadedFile;
use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;
use tokio::fs;
use uuid::Uuid;

const FALLBACK_FILE_NAME: &str = "upload.bin";

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("Failed to store upload {file_name}: {source}")]
    Io {
        file_name: String,
        #[source]
        source: std::io::Error,
    },
}

/// Persists an upload somewhere readable and returns its path.
#[async_trait]
pub trait UploadStore: Send + Sync {
    async fn save_temporarily(&self, upload: UploadedFile) -> Result<PathBuf, UploadError>;
}

/// Writes each upload to `<base>/<uuid>/<file name>`, keeping the original
/// file name so that extension-sensitive tools still work.
///
/// Files are not removed by the service.
pub struct TempDirUploadStore {
    base_path: PathBuf,
}

impl TempDirUploadStore {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }
}

#[async_trait]
impl UploadStore for TempDirUploadStore {
    async fn save_temporarily(&self, upload: UploadedFile) -> Result<PathBuf, UploadError> {
        let file_name = sanitize_file_name(&upload.file_name);
        let dir = self.base_path.join(Uuid::new_v4().to_string());
        let path = dir.join(&file_name);

        let io_error = |source| UploadError::Io {
            file_name: upload.file_name.clone(),
            source,
        };

        fs::create_dir_all(&dir).await.map_err(io_error)?;
        fs::write(&path, &upload.bytes).await.map_err(io_error)?;

        tracing::debug!(
            path = %path.display(),
            size = upload.bytes.len(),
            content_type = ?upload.content_type,
            "Stored upload"
        );

        Ok(path)
    }
}

/// Keeps only the final path component of a client-supplied file name.
fn sanitize_file_name(raw: &str) -> String {
    raw.rsplit(['/', '\\'])
        .next()
        .map(str::trim)
        .filter(|name| !name.is_empty() && *name != "." && *name != "..")
        .unwrap_or(FALLBACK_FILE_NAME)
        .to_string()
}
