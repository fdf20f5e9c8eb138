//! Error types for the orchestration core.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for media operations.
pub type MediaResult<T> = Result<T, MediaError>;

/// Errors that can occur while orchestrating a processing run or
/// serving the artifact tree.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("transcoder binary not found: {0}")]
    TranscoderNotFound(String),

    #[error("probe binary not found: {0}")]
    ProbeNotFound(String),

    #[error("source acquisition failed: {message}")]
    Acquisition { message: String },

    #[error("transcoding failed: {stderr}")]
    Transcode {
        stderr: String,
        exit_code: Option<i32>,
    },

    #[error("probe failed: {message}")]
    Probe { message: String },

    #[error("merge failed: {stderr}")]
    Merge {
        stderr: String,
        exit_code: Option<i32>,
    },

    #[error("thumbnail generation failed: {stderr}")]
    Thumbnail {
        stderr: String,
        exit_code: Option<i32>,
    },

    #[error("archive construction failed: {0}")]
    Archive(String),

    #[error("clip not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("invalid clip path: {0}")]
    InvalidPath(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

impl MediaError {
    /// Create an acquisition failure error.
    pub fn acquisition(message: impl Into<String>) -> Self {
        Self::Acquisition {
            message: message.into(),
        }
    }

    /// Create a transcode failure error.
    pub fn transcode(stderr: impl Into<String>, exit_code: Option<i32>) -> Self {
        Self::Transcode {
            stderr: stderr.into(),
            exit_code,
        }
    }

    /// Create a probe failure error.
    pub fn probe(message: impl Into<String>) -> Self {
        Self::Probe {
            message: message.into(),
        }
    }
}
