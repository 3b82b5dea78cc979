//! Streaming artifact download.
//!
//! Writes an artifact to disk chunk by chunk. Any failure or cancellation
//! removes the partial file before the error surfaces, so the install
//! directory never keeps a truncated download next to a real executable.

use std::path::Path;

use tokio::io::AsyncWriteExt;
use tokio_util::sync::CancellationToken;

use crate::error::{BootstrapError, Result};
use crate::github;

/// Download `url` to `dest`, streaming the body to disk.
///
/// `cancel` is honored between chunks. On any failure the partial `dest`
/// file is deleted before the error is returned.
pub async fn download_artifact(url: &str, dest: &Path, cancel: &CancellationToken) -> Result<()> {
    tracing::debug!("Downloading {} to {}", url, dest.display());

    let result = stream_to_file(url, dest, cancel).await;
    if result.is_err() {
        let _ = tokio::fs::remove_file(dest).await;
    }
    result
}

async fn stream_to_file(url: &str, dest: &Path, cancel: &CancellationToken) -> Result<()> {
    let client = github::build_client()?;
    let mut response = client.get(url).send().await?;

    if !response.status().is_success() {
        let status = response.status();
        return Err(BootstrapError::Status {
            url: url.to_string(),
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("unknown").to_string(),
        });
    }

    let mut file = tokio::fs::File::create(dest).await?;

    loop {
        let chunk = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                return Err(BootstrapError::Cancelled("artifact download".into()));
            }
            chunk = response.chunk() => chunk?,
        };
        let Some(chunk) = chunk else { break };
        file.write_all(&chunk).await?;
    }

    file.flush().await?;
    Ok(())
}
