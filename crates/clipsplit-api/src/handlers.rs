//! HTTP handlers.

pub mod archive;
pub mod clips;
pub mod process;

use axum::Json;
use serde_json::{json, Value};

/// Liveness probe.
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
