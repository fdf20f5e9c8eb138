//! Source acquisition.
//!
//! Exactly one input mode is attempted per processing run: either an
//! already-staged upload is relocated into the run workspace, or a
//! remote URL is resolved and streamed to disk. The "neither supplied"
//! case is rejected at the API boundary before any workspace mutation.

use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::MediaConfig;
use crate::download::download_source;
use crate::error::{MediaError, MediaResult};
use crate::fs_utils::move_file;
use crate::workspace::sanitize_name;

/// The input of a processing run.
#[derive(Debug, Clone)]
pub enum Source {
    /// A file the HTTP layer already staged into a temporary location.
    Upload {
        staged_path: PathBuf,
        original_name: String,
    },
    /// A remote video URL.
    Remote { url: String },
}

/// Materialize the source inside the workspace, returning its path.
pub async fn acquire(cfg: &MediaConfig, workspace: &Path, source: &Source) -> MediaResult<PathBuf> {
    match source {
        Source::Upload {
            staged_path,
            original_name,
        } => {
            let dest = workspace.join(sanitize_name(original_name));
            move_file(staged_path, &dest).await.map_err(|e| {
                MediaError::acquisition(format!(
                    "failed to move upload {} into workspace: {e}",
                    staged_path.display()
                ))
            })?;
            info!("acquired upload at {}", dest.display());
            Ok(dest)
        }
        Source::Remote { url } => download_source(&cfg.downloader_path, url, workspace).await,
    }
}
