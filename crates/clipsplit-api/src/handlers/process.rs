//! Processing request handler.
//!
//! The multipart request carries either a `video` file part or a
//! `video_url` field, plus the option fields. The uploaded part is
//! staged into the uploads directory first; acquisition then relocates
//! it into the run workspace.

use axum::extract::multipart::{Field, Multipart};
use axum::extract::State;
use axum::Json;
use serde::Serialize;
use tokio::io::AsyncWriteExt;
use tracing::info;

use clipsplit_media::workspace::sanitize_name;
use clipsplit_media::Source;
use clipsplit_models::{AudioMode, Clip, ProcessOptions};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Serialize)]
pub struct ProcessResponse {
    pub clips: Vec<Clip>,
}

/// `POST /process`
pub async fn process_video(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<ProcessResponse>> {
    let mut staged: Option<Source> = None;
    let mut video_url: Option<String> = None;
    let mut name_hint: Option<String> = None;
    let mut options = ProcessOptions::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("invalid multipart body: {e}")))?
    {
        match field.name().unwrap_or_default() {
            "video" => staged = Some(stage_upload(&state, field).await?),
            "video_url" => video_url = non_empty(field.text().await.ok()),
            "output_folder_name" => name_hint = non_empty(field.text().await.ok()),
            "clip_duration" => {
                if let Some(text) = non_empty(field.text().await.ok()) {
                    options.clip_duration_seconds = text
                        .parse()
                        .map_err(|_| ApiError::bad_request("clip_duration must be an integer"))?;
                }
            }
            "audio_only" => {
                options.audio_only = field.text().await.map(|t| t == "true").unwrap_or(false);
            }
            "audio_mode" => {
                if let Ok(text) = field.text().await {
                    options.audio_mode = match text.as_str() {
                        "full" => AudioMode::Full,
                        _ => AudioMode::Clips,
                    };
                }
            }
            "trim_start" => options.trim_start = parse_seconds(field.text().await.ok())?,
            "trim_end" => options.trim_end = parse_seconds(field.text().await.ok())?,
            other => info!("ignoring unrecognized field {other:?}"),
        }
    }

    options
        .validate()
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    // Exactly one input mode; reject before any workspace mutation.
    let source = match (staged, video_url) {
        (Some(upload), _) => upload,
        (None, Some(url)) => Source::Remote { url },
        (None, None) => return Err(ApiError::bad_request("No video file or URL provided")),
    };

    let clips = clipsplit_media::run_process(
        &state.config.media_config(),
        &state.config.output_root,
        name_hint.as_deref(),
        &source,
        &options,
    )
    .await?;

    Ok(Json(ProcessResponse { clips }))
}

/// Stream an uploaded part into the staging area under its original
/// file name.
async fn stage_upload(state: &AppState, mut field: Field<'_>) -> ApiResult<Source> {
    let original_name = field
        .file_name()
        .map(sanitize_name)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| ApiError::bad_request("upload is missing a file name"))?;

    tokio::fs::create_dir_all(&state.config.uploads_dir)
        .await
        .map_err(|e| ApiError::internal(format!("failed to create uploads dir: {e}")))?;

    let staged_path = state.config.uploads_dir.join(&original_name);
    let mut file = tokio::fs::File::create(&staged_path)
        .await
        .map_err(|e| ApiError::internal(format!("failed to stage upload: {e}")))?;

    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| ApiError::bad_request(format!("upload interrupted: {e}")))?
    {
        file.write_all(&chunk)
            .await
            .map_err(|e| ApiError::internal(format!("failed to write upload: {e}")))?;
    }
    file.flush()
        .await
        .map_err(|e| ApiError::internal(format!("failed to write upload: {e}")))?;

    Ok(Source::Upload {
        staged_path,
        original_name,
    })
}

fn non_empty(text: Option<String>) -> Option<String> {
    text.filter(|t| !t.trim().is_empty())
}

fn parse_seconds(text: Option<String>) -> ApiResult<Option<f64>> {
    match non_empty(text) {
        None => Ok(None),
        Some(t) => t
            .parse()
            .map(Some)
            .map_err(|_| ApiError::bad_request("trim values must be numbers")),
    }
}
