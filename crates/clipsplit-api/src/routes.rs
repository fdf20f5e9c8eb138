//! API routes.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handlers::archive::download_all;
use crate::handlers::clips::{delete_clip, merge_clips, rename_clip, share_clip, thumbnail};
use crate::handlers::health;
use crate::handlers::process::process_video;
use crate::middleware::cors_layer;
use crate::state::AppState;

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    let max_body_size = state.config.max_body_size;

    Router::new()
        .route("/process", post(process_video))
        .route("/merge", post(merge_clips))
        .route("/clips/*path", axum::routing::delete(delete_clip).put(rename_clip))
        .route("/download-all", get(download_all))
        .route("/thumbnail/*path", get(thumbnail))
        .route("/share", post(share_clip))
        .route("/health", get(health))
        // Uploads can be large; the axum default (2MB) would reject them.
        .layer(DefaultBodyLimit::max(max_body_size))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state)
}
