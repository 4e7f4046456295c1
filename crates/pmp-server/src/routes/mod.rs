pub mod ai;
pub mod auth;
pub mod health;
pub mod pmp;

use axum::Json;
use serde::Serialize;
use serde_json::Value;

/// `{"success": true, "data": ...}`
pub(crate) fn ok<T: Serialize>(data: T) -> Json<Value> {
    Json(serde_json::json!({ "success": true, "data": data }))
}
