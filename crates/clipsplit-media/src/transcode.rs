//! Transcoder subprocess invocation.
//!
//! The external splitter is launched exactly once per processing run,
//! with the run parameters serialized as command-line arguments. Its
//! stderr is captured in full for diagnostics; a non-zero exit is a
//! hard failure and the caller must not attempt artifact normalization.
//! The invoker performs no retries.

use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, warn};

use clipsplit_models::ProcessOptions;

use crate::config::MediaConfig;
use crate::error::{MediaError, MediaResult};

/// Outcome of one transcoder invocation.
#[derive(Debug)]
pub struct ProcessOutcome {
    pub exit_code: Option<i32>,
    pub stderr: String,
}

/// Serialize the run parameters into splitter arguments.
///
/// `--start`/`--end` are emitted only when the trim window actually
/// narrows the probed duration, matching the subprocess contract.
pub fn build_split_args(
    cfg: &MediaConfig,
    source: &Path,
    workspace: &Path,
    options: &ProcessOptions,
    probed_duration: f64,
) -> Vec<String> {
    let mut args = vec![
        source.to_string_lossy().into_owned(),
        workspace.to_string_lossy().into_owned(),
        options.clip_duration_seconds.to_string(),
    ];

    if options.audio_only {
        args.push("--audio-only".to_string());
        if options.wants_full_audio() {
            args.push("--full-audio".to_string());
        }
    }

    let start = options.trim_start.unwrap_or(0.0);
    let end = options.trim_end.unwrap_or(probed_duration);
    if start > 0.0 {
        args.push(format!("--start={start}"));
    }
    if end < probed_duration {
        args.push(format!("--end={end}"));
    }

    args.push(format!(
        "--transcoder_path={}",
        cfg.ffmpeg_path.to_string_lossy()
    ));

    args
}

/// Run the splitter once and capture its exit status and diagnostics.
pub async fn invoke(
    cfg: &MediaConfig,
    source: &Path,
    workspace: &Path,
    options: &ProcessOptions,
    probed_duration: f64,
) -> MediaResult<ProcessOutcome> {
    which::which(&cfg.splitter_path)
        .map_err(|_| MediaError::TranscoderNotFound(cfg.splitter_path.display().to_string()))?;

    let args = build_split_args(cfg, source, workspace, options, probed_duration);
    debug!("invoking splitter: {} {}", cfg.splitter_path.display(), args.join(" "));

    let output = Command::new(&cfg.splitter_path)
        .args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await?;

    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
    if !output.status.success() {
        warn!(
            "splitter exited with {:?}: {}",
            output.status.code(),
            stderr.trim()
        );
        return Err(MediaError::transcode(stderr, output.status.code()));
    }

    Ok(ProcessOutcome {
        exit_code: output.status.code(),
        stderr,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clipsplit_models::AudioMode;

    fn cfg() -> MediaConfig {
        MediaConfig::default()
    }

    #[test]
    fn test_default_options_emit_no_trim_flags() {
        let args = build_split_args(
            &cfg(),
            Path::new("/in/video.mp4"),
            Path::new("/out/run-1"),
            &ProcessOptions::default(),
            185.0,
        );

        assert_eq!(args[0], "/in/video.mp4");
        assert_eq!(args[1], "/out/run-1");
        assert_eq!(args[2], "60");
        assert!(!args.iter().any(|a| a.starts_with("--start")));
        assert!(!args.iter().any(|a| a.starts_with("--end")));
        assert!(!args.contains(&"--audio-only".to_string()));
    }

    #[test]
    fn test_trim_window_flags() {
        let options = ProcessOptions {
            trim_start: Some(10.0),
            trim_end: Some(120.0),
            ..Default::default()
        };
        let args = build_split_args(
            &cfg(),
            Path::new("in.mp4"),
            Path::new("ws"),
            &options,
            185.0,
        );
        assert!(args.contains(&"--start=10".to_string()));
        assert!(args.contains(&"--end=120".to_string()));
    }

    #[test]
    fn test_trim_end_at_full_duration_is_omitted() {
        let options = ProcessOptions {
            trim_end: Some(185.0),
            ..Default::default()
        };
        let args = build_split_args(
            &cfg(),
            Path::new("in.mp4"),
            Path::new("ws"),
            &options,
            185.0,
        );
        assert!(!args.iter().any(|a| a.starts_with("--end")));
    }

    #[test]
    fn test_full_audio_flags() {
        let options = ProcessOptions {
            audio_only: true,
            audio_mode: AudioMode::Full,
            ..Default::default()
        };
        let args = build_split_args(
            &cfg(),
            Path::new("in.mp4"),
            Path::new("ws"),
            &options,
            60.0,
        );
        assert!(args.contains(&"--audio-only".to_string()));
        assert!(args.contains(&"--full-audio".to_string()));
    }

    #[test]
    fn test_ffmpeg_path_is_forwarded() {
        let args = build_split_args(
            &cfg(),
            Path::new("in.mp4"),
            Path::new("ws"),
            &ProcessOptions::default(),
            60.0,
        );
        assert!(args.iter().any(|a| a.starts_with("--transcoder_path=")));
    }

    #[cfg(unix)]
    fn fake_splitter(dir: &Path, body: &str) -> std::path::PathBuf {
        use std::os::unix::fs::PermissionsExt;
        let path = dir.join("fake-splitter");
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_nonzero_exit_surfaces_stderr() {
        let dir = tempfile::TempDir::new().unwrap();
        let cfg = MediaConfig {
            splitter_path: fake_splitter(dir.path(), "echo 'codec mismatch' >&2; exit 3"),
            ..MediaConfig::default()
        };

        let err = invoke(
            &cfg,
            Path::new("in.mp4"),
            dir.path(),
            &ProcessOptions::default(),
            60.0,
        )
        .await
        .unwrap_err();

        match err {
            MediaError::Transcode { stderr, exit_code } => {
                assert!(stderr.contains("codec mismatch"));
                assert_eq!(exit_code, Some(3));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_zero_exit_returns_outcome() {
        let dir = tempfile::TempDir::new().unwrap();
        let cfg = MediaConfig {
            splitter_path: fake_splitter(dir.path(), "exit 0"),
            ..MediaConfig::default()
        };

        let outcome = invoke(
            &cfg,
            Path::new("in.mp4"),
            dir.path(),
            &ProcessOptions::default(),
            60.0,
        )
        .await
        .unwrap();
        assert_eq!(outcome.exit_code, Some(0));
    }
}
