//! Multi-clip merge via the concat demuxer.
//!
//! Inputs are concatenated in the given order with stream copy (no
//! re-encode) into a freshly allocated run workspace. The input clips
//! are left untouched.

use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::info;

use clipsplit_models::Clip;

use crate::config::MediaConfig;
use crate::error::{MediaError, MediaResult};
use crate::registry::resolve_clip_path;
use crate::workspace;

/// File name of the concat manifest written into the merge workspace.
pub const MANIFEST_NAME: &str = "filelist.txt";

/// Fixed output name of a merged artifact.
pub const MERGED_NAME: &str = "merged.mp4";

/// Concatenate the given clips into a new run workspace.
pub async fn merge_clips(
    cfg: &MediaConfig,
    output_root: &Path,
    clip_paths: &[String],
) -> MediaResult<Clip> {
    if clip_paths.is_empty() {
        return Err(MediaError::InvalidPath(
            "merge requires at least one clip path".to_string(),
        ));
    }

    // Resolve and verify every input before touching the filesystem.
    let mut inputs = Vec::with_capacity(clip_paths.len());
    for relative in clip_paths {
        let full = resolve_clip_path(output_root, relative)?;
        if !full.is_file() {
            return Err(MediaError::NotFound(full));
        }
        inputs.push(full);
    }

    let ws = workspace::allocate(output_root, None).await?;
    let manifest_path = ws.join(MANIFEST_NAME);
    let mut manifest = String::new();
    for input in &inputs {
        manifest.push_str("file '");
        manifest.push_str(input.to_string_lossy().as_ref());
        manifest.push_str("'\n");
    }
    tokio::fs::write(&manifest_path, manifest).await?;

    let output_path = ws.join(MERGED_NAME);
    let output = Command::new(&cfg.ffmpeg_path)
        .args(["-y", "-v", "error", "-f", "concat", "-safe", "0", "-i"])
        .arg(&manifest_path)
        .args(["-c", "copy"])
        .arg(&output_path)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await?;

    if !output.status.success() {
        return Err(MediaError::Merge {
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code: output.status.code(),
        });
    }

    let workspace_name = ws
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    info!("merged {} clips into {}", inputs.len(), output_path.display());
    Ok(Clip::new(&workspace_name, MERGED_NAME))
}
