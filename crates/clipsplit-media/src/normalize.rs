//! Artifact normalization.
//!
//! After a successful transcode, workspace output files are renamed into
//! the stable `clip_<i>` scheme. Normalization is total: every file with
//! a recognized media extension present at scan time ends up represented
//! in the returned clip list exactly once, either under its new name or,
//! when the rename loses a race with a lingering file handle, under its
//! pre-existing name.

use std::path::Path;
use std::time::Duration;
use tracing::warn;

use clipsplit_models::{Clip, ProcessOptions, FULL_AUDIO_FILE_NAME};

use crate::error::MediaResult;

/// Wait out the settle delay, then normalize the workspace.
///
/// The delay gives the transcoder time to release its output file
/// handles after process exit. A fixed wait, not a polling loop.
pub async fn settle_and_normalize(
    workspace: &Path,
    options: &ProcessOptions,
    settle_delay: Duration,
) -> MediaResult<Vec<Clip>> {
    if !settle_delay.is_zero() {
        tokio::time::sleep(settle_delay).await;
    }
    normalize(workspace, options).await
}

/// Scan the workspace and rename outputs into index order.
pub async fn normalize(workspace: &Path, options: &ProcessOptions) -> MediaResult<Vec<Clip>> {
    let workspace_name = workspace
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    if options.wants_full_audio() {
        let full_audio = workspace.join(FULL_AUDIO_FILE_NAME);
        if full_audio.is_file() {
            return Ok(vec![Clip::new(&workspace_name, FULL_AUDIO_FILE_NAME)]);
        }
        // Reportable anomaly, not a failure: the caller gets an empty
        // clip list.
        warn!("full audio file not found in {}", workspace.display());
        return Ok(Vec::new());
    }

    // Listing order is treated as generation order; no re-sorting.
    let mut found = Vec::new();
    let mut entries = tokio::fs::read_dir(workspace).await?;
    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name().to_string_lossy().into_owned();
        if clipsplit_models::is_media_file(&name) {
            found.push(name);
        }
    }

    let mut clips = Vec::with_capacity(found.len());
    for (i, old_name) in found.iter().enumerate() {
        let extension = old_name.rsplit('.').next().unwrap_or_default().to_ascii_lowercase();
        let new_name = format!("clip_{}.{extension}", i + 1);

        if *old_name == new_name {
            clips.push(Clip::new(&workspace_name, &new_name));
            continue;
        }

        let old_path = workspace.join(old_name);
        if !old_path.exists() {
            // Lost the race with the settle delay: keep the artifact
            // under its original name rather than dropping it.
            warn!("file vanished before rename: {}", old_path.display());
            clips.push(Clip::new(&workspace_name, old_name));
            continue;
        }

        match tokio::fs::rename(&old_path, workspace.join(&new_name)).await {
            Ok(()) => clips.push(Clip::new(&workspace_name, &new_name)),
            Err(e) => {
                warn!("rename failed for {}: {}", old_path.display(), e);
                clips.push(Clip::new(&workspace_name, old_name));
            }
        }
    }

    Ok(clips)
}
