//! API configuration.

use std::path::PathBuf;
use std::time::Duration;

use clipsplit_media::MediaConfig;

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Root directory holding run workspaces
    pub output_root: PathBuf,
    /// Staging area for multipart uploads
    pub uploads_dir: PathBuf,
    /// External splitter program
    pub splitter_path: PathBuf,
    /// FFmpeg binary
    pub ffmpeg_path: PathBuf,
    /// FFprobe binary
    pub ffprobe_path: PathBuf,
    /// Remote downloader binary
    pub downloader_path: PathBuf,
    /// Settle delay before scanning transcoder output
    pub settle_delay: Duration,
    /// Base URL for shared clip links
    pub share_base_url: String,
    /// CORS origins
    pub cors_origins: Vec<String>,
    /// Max request body size (uploads included)
    pub max_body_size: usize,
    /// Environment (development/production)
    pub environment: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
            output_root: PathBuf::from("output"),
            uploads_dir: PathBuf::from("uploads"),
            splitter_path: PathBuf::from("video-splitter"),
            ffmpeg_path: PathBuf::from("ffmpeg"),
            ffprobe_path: PathBuf::from("ffprobe"),
            downloader_path: PathBuf::from("yt-dlp"),
            settle_delay: Duration::from_millis(1000),
            share_base_url: "https://example.com/share".to_string(),
            cors_origins: vec!["*".to_string()],
            max_body_size: 2 * 1024 * 1024 * 1024, // 2GB uploads
            environment: "development".to_string(),
        }
    }
}

impl ApiConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: std::env::var("API_HOST").unwrap_or(defaults.host),
            port: std::env::var("API_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.port),
            output_root: std::env::var("OUTPUT_ROOT")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_root),
            uploads_dir: std::env::var("UPLOADS_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.uploads_dir),
            splitter_path: std::env::var("SPLITTER_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.splitter_path),
            ffmpeg_path: std::env::var("FFMPEG_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.ffmpeg_path),
            ffprobe_path: std::env::var("FFPROBE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.ffprobe_path),
            downloader_path: std::env::var("DOWNLOADER_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.downloader_path),
            settle_delay: Duration::from_millis(
                std::env::var("SETTLE_DELAY_MS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(1000),
            ),
            share_base_url: std::env::var("SHARE_BASE_URL").unwrap_or(defaults.share_base_url),
            cors_origins: std::env::var("CORS_ORIGINS")
                .map(|s| s.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or(defaults.cors_origins),
            max_body_size: std::env::var("MAX_BODY_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_body_size),
            environment: std::env::var("ENVIRONMENT").unwrap_or(defaults.environment),
        }
    }

    /// Check if running in production mode.
    pub fn is_production(&self) -> bool {
        self.environment.to_lowercase() == "production"
    }

    /// External tool configuration for the orchestration core.
    pub fn media_config(&self) -> MediaConfig {
        MediaConfig {
            splitter_path: self.splitter_path.clone(),
            ffmpeg_path: self.ffmpeg_path.clone(),
            ffprobe_path: self.ffprobe_path.clone(),
            downloader_path: self.downloader_path.clone(),
            settle_delay: self.settle_delay,
        }
    }
}
