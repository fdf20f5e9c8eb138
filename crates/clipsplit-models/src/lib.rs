//! Shared data models for the clipsplit backend.
//!
//! This crate provides Serde-serializable types for:
//! - Clip artifacts addressed by output-root-relative paths
//! - Processing options validated at the API boundary

pub mod clip;
pub mod options;

pub use clip::Clip;
pub use options::{AudioMode, OptionsError, ProcessOptions};

/// File extensions treated as clip artifacts by normalization and archiving.
pub const MEDIA_EXTENSIONS: &[&str] = &["mp4", "mp3"];

/// Well-known output name written by the transcoder in full-audio mode.
pub const FULL_AUDIO_FILE_NAME: &str = "full_audio.mp3";

/// Check whether a file name carries a recognized media extension.
pub fn is_media_file(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    MEDIA_EXTENSIONS
        .iter()
        .any(|ext| lower.ends_with(&format!(".{ext}")))
}
