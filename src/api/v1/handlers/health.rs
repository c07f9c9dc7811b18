use axum::Json;
use serde_json::{Value, json};

/// Liveness probe; deliberately outside the access-token middleware.
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
