//! Thumbnail extraction.

use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

use crate::config::MediaConfig;
use crate::error::{MediaError, MediaResult};

/// Capture point for thumbnails.
pub const THUMBNAIL_TIMESTAMP: &str = "00:00:01";

/// Fixed thumbnail height; width keeps the aspect ratio.
pub const THUMBNAIL_HEIGHT: u32 = 150;

/// Extract one frame near the 1-second mark, scaled to a fixed height.
pub async fn generate_thumbnail(
    cfg: &MediaConfig,
    video_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
) -> MediaResult<()> {
    let output = Command::new(&cfg.ffmpeg_path)
        .args(["-y", "-v", "error", "-ss", THUMBNAIL_TIMESTAMP, "-i"])
        .arg(video_path.as_ref())
        .args([
            "-vframes",
            "1",
            "-vf",
            &format!("scale=-1:{THUMBNAIL_HEIGHT}"),
        ])
        .arg(output_path.as_ref())
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await?;

    if !output.status.success() {
        return Err(MediaError::Thumbnail {
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code: output.status.code(),
        });
    }

    Ok(())
}
