//! Source duration probing.

use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

use crate::error::{MediaError, MediaResult};

/// Query the duration of a media file in seconds.
///
/// The probe subprocess prints the duration as plain text on stdout;
/// a non-zero exit is a probe failure.
pub async fn probe_duration(ffprobe: &Path, input: &Path) -> MediaResult<f64> {
    if !input.exists() {
        return Err(MediaError::NotFound(input.to_path_buf()));
    }

    which::which(ffprobe).map_err(|_| MediaError::ProbeNotFound(ffprobe.display().to_string()))?;

    let output = Command::new(ffprobe)
        .args([
            "-v",
            "error",
            "-show_entries",
            "format=duration",
            "-of",
            "default=noprint_wrappers=1:nokey=1",
        ])
        .arg(input)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await?;

    if !output.status.success() {
        return Err(MediaError::probe(String::from_utf8_lossy(&output.stderr)));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    stdout
        .trim()
        .parse::<f64>()
        .map_err(|_| MediaError::probe(format!("unparseable duration: {:?}", stdout.trim())))
}
