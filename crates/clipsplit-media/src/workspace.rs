//! Run workspace allocation.
//!
//! Each processing or merge run gets an exclusive output directory under
//! the output root, named either `run-<N>` (N derived from a directory
//! scan, not a persisted counter) or a caller-supplied sanitized name.
//!
//! The scan-then-create step is not atomic against concurrent
//! allocations. Creation is idempotent ("already exists" is success), so
//! two racing unnamed allocations can share a directory in the worst
//! case; callers needing strict uniqueness supply an explicit name.

use std::path::{Path, PathBuf};
use tokio::fs;

use crate::error::MediaResult;

/// Prefix for sequence-numbered run directories.
pub const RUN_PREFIX: &str = "run-";

/// Allocate a run workspace under `output_root`, creating the root if
/// absent. Returns the workspace path; the directory exists on return.
pub async fn allocate(output_root: &Path, name_hint: Option<&str>) -> MediaResult<PathBuf> {
    fs::create_dir_all(output_root).await?;

    let dir_name = match name_hint {
        Some(hint) => sanitize_name(hint),
        None => {
            let next = max_run_number(output_root)?.map_or(1, |n| n + 1);
            format!("{RUN_PREFIX}{next}")
        }
    };

    let workspace = output_root.join(dir_name);
    fs::create_dir_all(&workspace).await?;
    Ok(workspace)
}

/// Replace characters outside the allow-list `[A-Za-z0-9-_. ]` with `_`.
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ' ') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Highest `run-<N>` number present under `output_root`, if any.
///
/// The scan is synchronous so it can also run on the blocking pool
/// during archive construction.
fn max_run_number(output_root: &Path) -> MediaResult<Option<u64>> {
    let mut max: Option<u64> = None;
    for entry in std::fs::read_dir(output_root)? {
        let entry = entry?;
        if !entry.path().is_dir() {
            continue;
        }
        if let Some(n) = parse_run_number(&entry.file_name().to_string_lossy()) {
            max = Some(max.map_or(n, |m| m.max(n)));
        }
    }
    Ok(max)
}

/// Locate the workspace with the highest run number, compared
/// numerically rather than lexically.
pub fn latest_run(output_root: &Path) -> MediaResult<Option<PathBuf>> {
    if !output_root.exists() {
        return Ok(None);
    }
    Ok(max_run_number(output_root)?.map(|n| output_root.join(format!("{RUN_PREFIX}{n}"))))
}

fn parse_run_number(dir_name: &str) -> Option<u64> {
    dir_name.strip_prefix(RUN_PREFIX)?.parse().ok()
}
