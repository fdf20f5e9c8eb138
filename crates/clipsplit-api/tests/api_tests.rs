//! API integration tests.
//!
//! Exercise the router end to end against a temporary output root.

use std::path::Path;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use tempfile::TempDir;
use tower::ServiceExt;

use clipsplit_api::{create_router, ApiConfig, AppState};

fn test_router(output_root: &Path) -> Router {
    let config = ApiConfig {
        output_root: output_root.to_path_buf(),
        uploads_dir: output_root.join("uploads"),
        settle_delay: Duration::ZERO,
        share_base_url: "https://example.com/share".to_string(),
        ..ApiConfig::default()
    };
    create_router(AppState::new(config))
}

fn seed_clip(root: &Path, workspace: &str, name: &str) {
    let ws = root.join(workspace);
    std::fs::create_dir_all(&ws).unwrap();
    std::fs::write(ws.join(name), b"media").unwrap();
}

async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

#[tokio::test]
async fn test_health_endpoint() {
    let root = TempDir::new().unwrap();
    let response = test_router(root.path())
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_process_without_input_is_bad_request() {
    let root = TempDir::new().unwrap();
    let boundary = "test-boundary";
    let response = test_router(root.path())
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/process")
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={boundary}"),
                )
                .body(Body::from(format!("--{boundary}--\r\n")))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_bytes(response).await;
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert!(json["detail"].as_str().unwrap().contains("No video file or URL"));

    // No side effects before validation.
    assert!(std::fs::read_dir(root.path()).unwrap().next().is_none());
}

#[tokio::test]
async fn test_delete_missing_clip_is_404() {
    let root = TempDir::new().unwrap();
    let response = test_router(root.path())
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/clips/run-1/ghost.mp4")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_traversal_path_is_rejected() {
    let root = TempDir::new().unwrap();
    let response = test_router(root.path())
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/clips/..%2F..%2Fetc%2Fpasswd")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_rename_then_delete_round_trip() {
    let root = TempDir::new().unwrap();
    seed_clip(root.path(), "run-1", "clip_1.mp4");

    let response = test_router(root.path())
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/clips/run-1/clip_1.mp4")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"new_name": "intro.mp4"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json: serde_json::Value =
        serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(json["clip"]["name"], "intro.mp4");
    assert_eq!(json["clip"]["path"], "run-1/intro.mp4");

    // The old path no longer resolves.
    let response = test_router(root.path())
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/clips/run-1/clip_1.mp4")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // The new path deletes fine, pruning the emptied workspace.
    let response = test_router(root.path())
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/clips/run-1/intro.mp4")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(!root.path().join("run-1").exists());
}

#[tokio::test]
async fn test_share_builds_external_url() {
    let root = TempDir::new().unwrap();
    seed_clip(root.path(), "run-1", "clip_1.mp4");

    let response = test_router(root.path())
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/share")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"clip_path": "run-1/clip_1.mp4"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json: serde_json::Value =
        serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(json["share_url"], "https://example.com/share/clip_1.mp4");
}

#[tokio::test]
async fn test_download_all_with_no_runs_is_valid_empty_zip() {
    let root = TempDir::new().unwrap();
    let response = test_router(root.path())
        .oneshot(
            Request::builder()
                .uri("/download-all")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/zip"
    );

    // No files means no progress lines; the whole body is the archive.
    let bytes = body_bytes(response).await;
    let archive = zip::ZipArchive::new(std::io::Cursor::new(bytes)).unwrap();
    assert_eq!(archive.len(), 0);
}

#[tokio::test]
async fn test_download_all_interleaves_progress_then_zip() {
    let root = TempDir::new().unwrap();
    seed_clip(root.path(), "run-1", "clip_1.mp4");
    seed_clip(root.path(), "run-1", "clip_2.mp4");

    let response = test_router(root.path())
        .oneshot(
            Request::builder()
                .uri("/download-all")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Apply the client contract: strip leading newline-delimited chunks
    // while they parse as JSON; the remainder is the archive blob.
    let mut bytes = body_bytes(response).await;
    let mut progress = Vec::new();
    while let Some(pos) = bytes.iter().position(|&b| b == b'\n') {
        let Ok(value) = serde_json::from_slice::<serde_json::Value>(&bytes[..pos]) else {
            break;
        };
        progress.push(value["progress"].as_f64().unwrap());
        bytes.drain(..=pos);
    }

    assert_eq!(progress.len(), 2);
    assert!((progress[0] - 0.5).abs() < 1e-9);
    assert!((progress[1] - 1.0).abs() < 1e-9);

    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(bytes)).unwrap();
    assert_eq!(archive.len(), 2);
    assert!(archive.by_name("run-1/clip_1.mp4").is_ok());
}

#[tokio::test]
async fn test_merge_with_missing_input_is_404() {
    let root = TempDir::new().unwrap();
    let response = test_router(root.path())
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/merge")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"clip_paths": ["run-1/ghost.mp4"]}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_thumbnail_of_missing_clip_is_404() {
    let root = TempDir::new().unwrap();
    let response = test_router(root.path())
        .oneshot(
            Request::builder()
                .uri("/thumbnail/run-1/ghost.mp4")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
