//! Environment/runtime helpers
//!
//! Sanity checks to ensure expected directories exist at startup.

use tracing::{info, warn};

/// Ensure the image upload directory exists and is writable.
pub async fn ensure_upload_dir(upload_dir: &str) -> anyhow::Result<()> {
    tokio::fs::create_dir_all(upload_dir)
        .await
        .map_err(|e| anyhow::anyhow!("cannot create {upload_dir}: {e}"))?;
    let meta = tokio::fs::metadata(upload_dir).await?;
    if meta.permissions().readonly() {
        warn!(%upload_dir, "upload directory is read-only; image uploads will fail");
    } else {
        info!(%upload_dir, "upload directory ready");
    }
    Ok(())
}
