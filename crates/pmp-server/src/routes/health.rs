use axum::Json;
use serde_json::Value;

/// GET /api/health: liveness, no auth.
pub async fn health() -> Json<Value> {
    Json(serde_json::json!({
        "success": true,
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
