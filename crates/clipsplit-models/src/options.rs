//! Processing options, validated once at the request boundary.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default clip length in seconds when the caller supplies none.
pub const DEFAULT_CLIP_DURATION_SECS: u32 = 60;

/// How audio extraction splits its output. Meaningful only when
/// `audio_only` is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioMode {
    /// One audio file per clip-duration window.
    #[default]
    Clips,
    /// A single file covering the whole source.
    Full,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OptionsError {
    #[error("clip_duration must be at least 1 second")]
    ZeroClipDuration,

    #[error("trim window is empty: start {start} >= end {end}")]
    EmptyTrimWindow { start: String, end: String },

    #[error("trim value must be non-negative")]
    NegativeTrim,
}

/// Recognized options for a processing run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessOptions {
    /// Length of each clip in seconds.
    pub clip_duration_seconds: u32,
    /// Extract audio instead of splitting video.
    pub audio_only: bool,
    /// Audio extraction mode, used only when `audio_only` is set.
    pub audio_mode: AudioMode,
    /// Trim window start in seconds; full duration when omitted.
    pub trim_start: Option<f64>,
    /// Trim window end in seconds; full duration when omitted.
    pub trim_end: Option<f64>,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            clip_duration_seconds: DEFAULT_CLIP_DURATION_SECS,
            audio_only: false,
            audio_mode: AudioMode::default(),
            trim_start: None,
            trim_end: None,
        }
    }
}

impl ProcessOptions {
    /// Validate the option bag. Called once at the boundary; the core
    /// assumes validated options from then on.
    pub fn validate(&self) -> Result<(), OptionsError> {
        if self.clip_duration_seconds == 0 {
            return Err(OptionsError::ZeroClipDuration);
        }
        if self.trim_start.is_some_and(|s| s < 0.0) || self.trim_end.is_some_and(|e| e < 0.0) {
            return Err(OptionsError::NegativeTrim);
        }
        if let (Some(start), Some(end)) = (self.trim_start, self.trim_end) {
            if start >= end {
                return Err(OptionsError::EmptyTrimWindow {
                    start: format!("{start}"),
                    end: format!("{end}"),
                });
            }
        }
        Ok(())
    }

    /// Whether this run asks for one full-length audio file.
    pub fn wants_full_audio(&self) -> bool {
        self.audio_only && self.audio_mode == AudioMode::Full
    }
}
