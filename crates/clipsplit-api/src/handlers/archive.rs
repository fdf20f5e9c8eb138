//! Bulk download handler.
//!
//! The response interleaves two kinds of records on one chunked byte
//! stream: newline-delimited JSON progress notifications, one per file
//! completed, followed by the raw zip bytes. Clients distinguish them
//! by attempting to parse each newline-delimited chunk as JSON and
//! treating parse failures as archive payload.

use std::time::{SystemTime, UNIX_EPOCH};

use axum::body::Body;
use axum::extract::State;
use axum::http::header;
use axum::response::Response;
use bytes::Bytes;
use tracing::warn;

use clipsplit_media::{ArchiveEvent, MediaError};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// `GET /download-all`
pub async fn download_all(State(state): State<AppState>) -> ApiResult<Response> {
    let mut rx = clipsplit_media::stream_latest_archive(state.config.output_root.clone());

    // Peek the first event so construction failures that happen before
    // any bytes have been sent still map to an error status.
    let first = rx.recv().await;
    if let Some(ArchiveEvent::Failed(msg)) = first {
        return Err(MediaError::Archive(msg).into());
    }

    let stream = futures_util::stream::unfold((first, rx), |(pending, mut rx)| async move {
        let event = match pending {
            Some(event) => Some(event),
            None => rx.recv().await,
        };
        match event {
            None => None,
            Some(ArchiveEvent::Failed(msg)) => {
                // Bytes already flowed: the stream simply ends incomplete.
                warn!("archive stream failed mid-response: {msg}");
                None
            }
            Some(event) => Some((Ok::<Bytes, std::io::Error>(encode_event(event)), (None, rx))),
        }
    });

    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();

    Response::builder()
        .header(header::CONTENT_TYPE, "application/zip")
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"clips_{millis}.zip\""),
        )
        .body(Body::from_stream(stream))
        .map_err(|e| ApiError::internal(format!("failed to build response: {e}")))
}

fn encode_event(event: ArchiveEvent) -> Bytes {
    match event {
        ArchiveEvent::Progress { completed, total } => {
            let fraction = completed as f64 / total.max(1) as f64;
            let mut line = serde_json::json!({ "progress": fraction }).to_string();
            line.push('\n');
            Bytes::from(line)
        }
        ArchiveEvent::Chunk(bytes) => Bytes::from(bytes),
        // Failed is handled by the stream driver.
        ArchiveEvent::Failed(_) => Bytes::new(),
    }
}
