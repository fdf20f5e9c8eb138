//! Remote source download.
//!
//! The downloader collaborator resolves the encodings available for a
//! URL; the best one is then streamed to disk with reqwest. A partially
//! written file is removed on any failure.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use futures_util::StreamExt;
use serde::Deserialize;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info};

use crate::error::{MediaError, MediaResult};

/// One encoding offered for a remote video.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteFormat {
    #[serde(default)]
    pub format_id: String,
    pub url: String,
    #[serde(default = "default_ext")]
    pub ext: String,
    #[serde(default)]
    pub height: Option<u32>,
    /// Total bitrate, the tiebreaker between same-height formats.
    #[serde(default)]
    pub tbr: Option<f64>,
}

fn default_ext() -> String {
    "mp4".to_string()
}

#[derive(Debug, Deserialize)]
struct FormatListing {
    #[serde(default)]
    formats: Vec<RemoteFormat>,
}

/// Ask the downloader collaborator for the formats available at `url`.
pub async fn resolve_formats(downloader: &Path, url: &str) -> MediaResult<Vec<RemoteFormat>> {
    which::which(downloader)
        .map_err(|_| MediaError::acquisition(format!("downloader not found: {}", downloader.display())))?;

    let output = Command::new(downloader)
        .args(["--dump-json", "--no-playlist", url])
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await?;

    if !output.status.success() {
        return Err(MediaError::acquisition(format!(
            "format resolution failed: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    let listing: FormatListing = serde_json::from_slice(&output.stdout)?;
    Ok(listing.formats)
}

/// Pick the highest-quality format: greatest height, bitrate breaking
/// ties.
pub fn select_best(formats: &[RemoteFormat]) -> Option<&RemoteFormat> {
    formats.iter().max_by(|a, b| {
        let key_a = (a.height.unwrap_or(0), a.tbr.unwrap_or(0.0));
        let key_b = (b.height.unwrap_or(0), b.tbr.unwrap_or(0.0));
        key_a
            .0
            .cmp(&key_b.0)
            .then(key_a.1.partial_cmp(&key_b.1).unwrap_or(std::cmp::Ordering::Equal))
    })
}

/// Materialize the remote video into the workspace as `source.<ext>`.
pub async fn download_source(
    downloader: &Path,
    url: &str,
    workspace: &Path,
) -> MediaResult<PathBuf> {
    let formats = resolve_formats(downloader, url).await?;
    let best = select_best(&formats)
        .ok_or_else(|| MediaError::acquisition(format!("no downloadable formats for {url}")))?;

    debug!(
        "selected format {} ({}p) for {}",
        best.format_id,
        best.height.unwrap_or(0),
        url
    );

    let dest = workspace.join(format!("source.{}", best.ext));
    match stream_to_file(&best.url, &dest).await {
        Ok(()) => {
            info!("downloaded {} to {}", url, dest.display());
            Ok(dest)
        }
        Err(e) => {
            // Never leave a partial source behind.
            let _ = tokio::fs::remove_file(&dest).await;
            Err(MediaError::acquisition(format!("download failed: {e}")))
        }
    }
}

async fn stream_to_file(url: &str, dest: &Path) -> MediaResult<()> {
    let response = reqwest::get(url).await?.error_for_status()?;
    let mut file = tokio::fs::File::create(dest).await?;

    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        file.write_all(&chunk?).await?;
    }
    file.flush().await?;
    Ok(())
}
