//! External tool configuration for the orchestration core.

use std::path::PathBuf;
use std::time::Duration;

/// Paths to the external collaborators plus the settle delay applied
/// before scanning transcoder output.
#[derive(Debug, Clone)]
pub struct MediaConfig {
    /// The external splitting transcoder program.
    pub splitter_path: PathBuf,
    /// FFmpeg, forwarded to the splitter and used directly for merge
    /// and thumbnail extraction.
    pub ffmpeg_path: PathBuf,
    /// FFprobe, used for the duration metadata query.
    pub ffprobe_path: PathBuf,
    /// Remote downloader used to resolve encodings for a source URL.
    pub downloader_path: PathBuf,
    /// Fixed wait before the artifact scan. The transcoder can hold
    /// output file handles briefly after process exit; this is a
    /// best-effort mitigation, not a guarantee.
    pub settle_delay: Duration,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            splitter_path: PathBuf::from("video-splitter"),
            ffmpeg_path: PathBuf::from("ffmpeg"),
            ffprobe_path: PathBuf::from("ffprobe"),
            downloader_path: PathBuf::from("yt-dlp"),
            settle_delay: Duration::from_millis(1000),
        }
    }
}
