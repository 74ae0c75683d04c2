//! Write-then-rename file replacement.

use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::domain::errors::ProvisionError;

/// Replaces `path` with `content` without ever exposing a partial file.
///
/// Content is written and flushed to a hidden `.<name>.tmp` sibling, then
/// renamed over `path`. The temp file is removed if any step fails.
///
/// # Errors
///
/// Returns [`ProvisionError::Io`] naming `path` on any failure.
pub async fn write_atomic(path: &Path, content: &str) -> Result<(), ProvisionError> {
    let tmp = temp_path(path);

    let result: std::io::Result<()> = async {
        let mut file = fs::File::create(&tmp).await?;
        file.write_all(content.as_bytes()).await?;
        file.sync_all().await?;
        fs::rename(&tmp, path).await
    }
    .await;

    if let Err(source) = result {
        let _ = fs::remove_file(&tmp).await;
        return Err(ProvisionError::io(path, source));
    }

    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.tmp"))
}
