//! Stateless clip registry operations, addressed by output-root-relative
//! paths. No metadata store: the filesystem layout is the registry.

use std::path::{Component, Path, PathBuf};
use tracing::{info, warn};

use clipsplit_models::Clip;

use crate::error::{MediaError, MediaResult};

/// Resolve a clip path against the output root, rejecting anything that
/// would escape it.
pub fn resolve_clip_path(output_root: &Path, relative: &str) -> MediaResult<PathBuf> {
    if relative.is_empty() {
        return Err(MediaError::InvalidPath("empty clip path".to_string()));
    }

    let rel = Path::new(relative);
    for component in rel.components() {
        match component {
            Component::Normal(_) => {}
            _ => {
                return Err(MediaError::InvalidPath(format!(
                    "clip path escapes output root: {relative}"
                )))
            }
        }
    }

    Ok(output_root.join(rel))
}

/// Delete a clip; prune its workspace directory if that emptied it.
///
/// Workspace cleanup is lazy and artifact-driven, never proactive.
pub async fn delete_clip(output_root: &Path, relative: &str) -> MediaResult<()> {
    let full = resolve_clip_path(output_root, relative)?;
    if !full.is_file() {
        return Err(MediaError::NotFound(full));
    }

    tokio::fs::remove_file(&full).await?;
    info!("deleted clip {}", full.display());

    if let Some(parent) = full.parent() {
        if parent != output_root && dir_is_empty(parent).await? {
            if let Err(e) = tokio::fs::remove_dir(parent).await {
                warn!("failed to prune empty workspace {}: {}", parent.display(), e);
            }
        }
    }

    Ok(())
}

/// Rename a clip in place, returning its updated identity.
pub async fn rename_clip(output_root: &Path, relative: &str, new_name: &str) -> MediaResult<Clip> {
    if new_name.is_empty() || new_name == ".." || new_name.contains(['/', '\\']) {
        return Err(MediaError::InvalidPath(format!(
            "invalid clip name: {new_name}"
        )));
    }

    let full = resolve_clip_path(output_root, relative)?;
    if !full.is_file() {
        return Err(MediaError::NotFound(full));
    }

    let parent = full
        .parent()
        .ok_or_else(|| MediaError::InvalidPath(relative.to_string()))?;
    tokio::fs::rename(&full, parent.join(new_name)).await?;

    let workspace_name = parent
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(Clip::new(&workspace_name, new_name))
}

async fn dir_is_empty(dir: &Path) -> MediaResult<bool> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    Ok(entries.next_entry().await?.is_none())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn seed_clip(root: &Path, workspace: &str, name: &str) {
        let ws = root.join(workspace);
        tokio::fs::create_dir_all(&ws).await.unwrap();
        tokio::fs::write(ws.join(name), b"x").await.unwrap();
    }

    #[test]
    fn test_traversal_is_rejected() {
        let root = Path::new("/srv/output");
        assert!(resolve_clip_path(root, "run-1/clip_1.mp4").is_ok());
        for bad in ["../secrets", "run-1/../../etc", "/etc/passwd", ""] {
            assert!(
                matches!(resolve_clip_path(root, bad), Err(MediaError::InvalidPath(_))),
                "expected rejection for {bad:?}"
            );
        }
    }

    #[tokio::test]
    async fn test_delete_prunes_emptied_workspace() {
        let root = TempDir::new().unwrap();
        seed_clip(root.path(), "run-1", "clip_1.mp4").await;

        delete_clip(root.path(), "run-1/clip_1.mp4").await.unwrap();

        assert!(!root.path().join("run-1").exists());
    }

    #[tokio::test]
    async fn test_delete_keeps_populated_workspace() {
        let root = TempDir::new().unwrap();
        seed_clip(root.path(), "run-1", "clip_1.mp4").await;
        seed_clip(root.path(), "run-1", "clip_2.mp4").await;

        delete_clip(root.path(), "run-1/clip_1.mp4").await.unwrap();

        assert!(root.path().join("run-1").is_dir());
        assert!(root.path().join("run-1/clip_2.mp4").is_file());
    }

    #[tokio::test]
    async fn test_delete_missing_clip_is_not_found() {
        let root = TempDir::new().unwrap();
        let err = delete_clip(root.path(), "run-9/clip_1.mp4").await.unwrap_err();
        assert!(matches!(err, MediaError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_rename_then_delete_round_trip() {
        let root = TempDir::new().unwrap();
        seed_clip(root.path(), "run-1", "clip_1.mp4").await;

        let renamed = rename_clip(root.path(), "run-1/clip_1.mp4", "intro.mp4")
            .await
            .unwrap();
        assert_eq!(renamed.name, "intro.mp4");
        assert_eq!(renamed.path, "run-1/intro.mp4");

        // The old path no longer resolves to a file.
        let err = delete_clip(root.path(), "run-1/clip_1.mp4").await.unwrap_err();
        assert!(matches!(err, MediaError::NotFound(_)));

        delete_clip(root.path(), &renamed.path).await.unwrap();
    }

    #[tokio::test]
    async fn test_rename_allows_dotted_display_names() {
        let root = TempDir::new().unwrap();
        seed_clip(root.path(), "run-1", "clip_1.mp4").await;

        let renamed = rename_clip(root.path(), "run-1/clip_1.mp4", "v1..final.mp4")
            .await
            .unwrap();
        assert_eq!(renamed.name, "v1..final.mp4");
        assert!(root.path().join("run-1/v1..final.mp4").is_file());
    }

    #[tokio::test]
    async fn test_rename_rejects_separators_in_new_name() {
        let root = TempDir::new().unwrap();
        seed_clip(root.path(), "run-1", "clip_1.mp4").await;

        let err = rename_clip(root.path(), "run-1/clip_1.mp4", "../escape.mp4")
            .await
            .unwrap_err();
        assert!(matches!(err, MediaError::InvalidPath(_)));
    }
}
