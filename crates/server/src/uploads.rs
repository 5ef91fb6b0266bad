use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::errors::ApiError;
use crate::forms::UploadedImage;

/// Extension for each accepted image MIME type.
const MIME_EXTENSIONS: [(&str, &str); 3] = [
    ("image/png", "png"),
    ("image/jpeg", "jpeg"),
    ("image/jpg", "jpg"),
];

pub fn extension_for(content_type: &str) -> Option<&'static str> {
    let essence = content_type.split(';').next().unwrap_or_default().trim().to_ascii_lowercase();
    MIME_EXTENSIONS.iter().find(|(mime, _)| *mime == essence).map(|(_, ext)| *ext)
}

/// Writes uploaded images to a directory and removes them again.
///
/// Stored references are `<dir>/<uuid>.<ext>`; they are what gets recorded on
/// users and places.
#[derive(Debug, Clone)]
pub struct ImageStore {
    dir: PathBuf,
    max_bytes: usize,
}

impl ImageStore {
    pub fn new(dir: impl Into<PathBuf>, max_bytes: usize) -> Self {
        Self { dir: dir.into(), max_bytes }
    }

    pub fn from_config(cfg: &configs::UploadConfig) -> Self {
        Self::new(&cfg.dir, cfg.max_image_bytes)
    }

    pub fn dir(&self) -> &Path { &self.dir }

    pub fn max_bytes(&self) -> usize { self.max_bytes }

    /// Check type and size, then persist. Returns the stored reference.
    pub async fn save(&self, image: &UploadedImage) -> Result<String, ApiError> {
        let ext = extension_for(&image.content_type).ok_or_else(|| {
            debug!(content_type = %image.content_type, "unsupported image type");
            ApiError::Validation("Invalid mime type!".into())
        })?;
        if image.bytes.len() > self.max_bytes {
            debug!(size = image.bytes.len(), max = self.max_bytes, "image too large");
            return Err(ApiError::invalid_inputs());
        }
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| ApiError::Internal(format!("create upload dir: {e}")))?;
        let path = self.dir.join(format!("{}.{}", Uuid::new_v4(), ext));
        tokio::fs::write(&path, &image.bytes)
            .await
            .map_err(|e| ApiError::Internal(format!("write image: {e}")))?;
        let stored = path.to_string_lossy().replace('\\', "/");
        info!(path = %stored, size = image.bytes.len(), "image_stored");
        Ok(stored)
    }

    /// Best-effort removal of a previously stored image. References outside
    /// the upload directory are ignored.
    pub async fn discard(&self, stored: &str) {
        let path = Path::new(stored);
        if path.parent() != Some(self.dir.as_path()) {
            warn!(path = %stored, "refusing to remove file outside upload dir");
            return;
        }
        if let Err(e) = tokio::fs::remove_file(path).await {
            warn!(path = %stored, error = %e, "image cleanup failed");
        }
    }
}
