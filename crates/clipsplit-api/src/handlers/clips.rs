//! Clip registry handlers: delete, rename, merge, thumbnail, share.

use std::time::{SystemTime, UNIX_EPOCH};

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use scopeguard::defer;
use serde::{Deserialize, Serialize};
use tracing::warn;

use clipsplit_media::{registry, resolve_clip_path};
use clipsplit_models::Clip;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Serialize)]
pub struct DeleteResponse {
    pub message: String,
}

/// `DELETE /clips/{path}`
pub async fn delete_clip(
    State(state): State<AppState>,
    Path(clip_path): Path<String>,
) -> ApiResult<Json<DeleteResponse>> {
    registry::delete_clip(&state.config.output_root, &clip_path).await?;
    Ok(Json(DeleteResponse {
        message: "Clip deleted successfully".to_string(),
    }))
}

#[derive(Deserialize)]
pub struct RenameRequest {
    pub new_name: String,
}

#[derive(Serialize)]
pub struct RenameResponse {
    pub clip: Clip,
}

/// `PUT /clips/{path}`
pub async fn rename_clip(
    State(state): State<AppState>,
    Path(clip_path): Path<String>,
    Json(request): Json<RenameRequest>,
) -> ApiResult<Json<RenameResponse>> {
    let clip =
        registry::rename_clip(&state.config.output_root, &clip_path, &request.new_name).await?;
    Ok(Json(RenameResponse { clip }))
}

#[derive(Deserialize)]
pub struct MergeRequest {
    pub clip_paths: Vec<String>,
}

#[derive(Serialize)]
pub struct MergeResponse {
    pub merged_clip: Clip,
}

/// `POST /merge`
pub async fn merge_clips(
    State(state): State<AppState>,
    Json(request): Json<MergeRequest>,
) -> ApiResult<Json<MergeResponse>> {
    let merged_clip = clipsplit_media::merge_clips(
        &state.config.media_config(),
        &state.config.output_root,
        &request.clip_paths,
    )
    .await?;
    Ok(Json(MergeResponse { merged_clip }))
}

/// `GET /thumbnail/{path}`
///
/// The frame is written to a transient file which is deleted on every
/// response path, success or error.
pub async fn thumbnail(
    State(state): State<AppState>,
    Path(clip_path): Path<String>,
) -> ApiResult<Response> {
    let full = resolve_clip_path(&state.config.output_root, &clip_path)?;
    if !full.is_file() {
        return Err(ApiError::not_found("Clip not found for thumbnail generation"));
    }

    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    let transient = std::env::temp_dir().join(format!("thumbnail_{millis}.jpg"));

    let cleanup_path = transient.clone();
    defer! {
        if let Err(e) = std::fs::remove_file(&cleanup_path) {
            warn!("failed to delete transient thumbnail {}: {}", cleanup_path.display(), e);
        }
    }

    clipsplit_media::generate_thumbnail(&state.config.media_config(), &full, &transient).await?;
    let bytes = tokio::fs::read(&transient)
        .await
        .map_err(|e| ApiError::internal(format!("failed to read thumbnail: {e}")))?;

    Ok(([(header::CONTENT_TYPE, "image/jpeg")], bytes).into_response())
}

#[derive(Deserialize)]
pub struct ShareRequest {
    pub clip_path: String,
}

#[derive(Serialize)]
pub struct ShareResponse {
    pub share_url: String,
}

/// `POST /share`
///
/// The actual publishing collaborator is external; this produces the
/// externally addressable URL for the clip.
pub async fn share_clip(
    State(state): State<AppState>,
    Json(request): Json<ShareRequest>,
) -> ApiResult<Json<ShareResponse>> {
    let full = resolve_clip_path(&state.config.output_root, &request.clip_path)?;
    let file_name = full
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| ApiError::bad_request("clip path has no file name"))?;

    let share_url = format!(
        "{}/{}",
        state.config.share_base_url.trim_end_matches('/'),
        file_name
    );
    Ok(Json(ShareResponse { share_url }))
}
