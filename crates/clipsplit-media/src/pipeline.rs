//! The processing run pipeline: allocate, acquire, probe, transcode,
//! settle, normalize.

use std::path::Path;
use tracing::info;

use clipsplit_models::{Clip, ProcessOptions};

use crate::acquire::{self, Source};
use crate::config::MediaConfig;
use crate::error::MediaResult;
use crate::normalize;
use crate::probe;
use crate::transcode;
use crate::workspace;

/// Run one processing request end to end, returning the clip list.
///
/// Options must already be validated at the boundary. The transcoder is
/// invoked exactly once; a non-zero exit aborts before normalization.
pub async fn run_process(
    cfg: &MediaConfig,
    output_root: &Path,
    name_hint: Option<&str>,
    source: &Source,
    options: &ProcessOptions,
) -> MediaResult<Vec<Clip>> {
    let ws = workspace::allocate(output_root, name_hint).await?;
    let source_path = acquire::acquire(cfg, &ws, source).await?;

    let duration = probe::probe_duration(&cfg.ffprobe_path, &source_path).await?;
    info!(
        "processing {} ({duration:.1}s) in {}",
        source_path.display(),
        ws.display()
    );

    transcode::invoke(cfg, &source_path, &ws, options, duration).await?;

    normalize::settle_and_normalize(&ws, options, cfg.settle_delay).await
}
