//! Bulk archive construction over the most recent run workspace.
//!
//! The zip is built into a temporary file under the output root, adding
//! files strictly sequentially (one open read descriptor at a time) so
//! memory stays bounded and progress reporting stays monotonic. Once
//! built, the archive bytes are streamed out in chunks and the
//! temporary file is deleted; deletion failure is logged, never
//! surfaced, since the response has already completed by then.

use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use tokio::sync::mpsc;
use tracing::{info, warn};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::workspace::latest_run;

/// Chunk size for streaming the finished archive.
const CHUNK_SIZE: usize = 64 * 1024;

/// Records emitted over the archive response channel.
#[derive(Debug)]
pub enum ArchiveEvent {
    /// One file finished; `completed / total` is the progress fraction.
    Progress { completed: usize, total: usize },
    /// Raw archive bytes.
    Chunk(Vec<u8>),
    /// Construction failed before the archive was complete.
    Failed(String),
}

/// Kick off an archive build over the latest `run-*` workspace.
///
/// Runs on the blocking pool; the returned receiver yields progress
/// events interleaved before the archive byte chunks.
pub fn stream_latest_archive(output_root: PathBuf) -> mpsc::Receiver<ArchiveEvent> {
    let (tx, rx) = mpsc::channel(16);
    tokio::task::spawn_blocking(move || {
        if let Err(e) = run_archive(&output_root, &tx) {
            let _ = tx.blocking_send(ArchiveEvent::Failed(e.to_string()));
        }
    });
    rx
}

fn run_archive(
    output_root: &Path,
    tx: &mpsc::Sender<ArchiveEvent>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    std::fs::create_dir_all(output_root)?;

    // Only the newest workspace is archived, numeric tie-break.
    let files = match latest_run(output_root)? {
        Some(latest) => collect_media_files(&latest)?,
        None => Vec::new(),
    };

    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    let zip_path = output_root.join(format!("clips_{millis}.zip"));

    let result = write_zip(output_root, &files, &zip_path, tx)
        .and_then(|()| stream_zip_bytes(&zip_path, tx));

    if let Err(e) = std::fs::remove_file(&zip_path) {
        warn!("failed to delete temporary zip {}: {}", zip_path.display(), e);
    }

    result
}

fn write_zip(
    output_root: &Path,
    files: &[PathBuf],
    zip_path: &Path,
    tx: &mpsc::Sender<ArchiveEvent>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut writer = ZipWriter::new(File::create(zip_path)?);
    let options = SimpleFileOptions::default();
    let total = files.len();

    for (i, file) in files.iter().enumerate() {
        let entry_name = file
            .strip_prefix(output_root)
            .unwrap_or(file)
            .to_string_lossy()
            .replace('\\', "/");
        writer.start_file(entry_name, options)?;

        let mut reader = BufReader::new(File::open(file)?);
        std::io::copy(&mut reader, &mut writer)?;

        let _ = tx.blocking_send(ArchiveEvent::Progress {
            completed: i + 1,
            total,
        });
    }

    writer.finish()?.flush()?;
    info!("archived {} files into {}", total, zip_path.display());
    Ok(())
}

fn stream_zip_bytes(
    zip_path: &Path,
    tx: &mpsc::Sender<ArchiveEvent>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut reader = BufReader::new(File::open(zip_path)?);
    let mut buf = vec![0u8; CHUNK_SIZE];
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        if tx.blocking_send(ArchiveEvent::Chunk(buf[..n].to_vec())).is_err() {
            // Receiver gone: the client hung up mid-stream.
            break;
        }
    }
    Ok(())
}

/// Recursively collect recognized-media files under one workspace.
pub fn collect_media_files(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    walk(dir, &mut files)?;
    Ok(files)
}

fn walk(dir: &Path, files: &mut Vec<PathBuf>) -> std::io::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            walk(&path, files)?;
        } else if clipsplit_models::is_media_file(&entry.file_name().to_string_lossy()) {
            files.push(path);
        }
    }
    Ok(())
}
