use axum::Json;
use serde_json::{json, Value};

pub async fn health() -> Json<Value> {
    Json(json!({
        "message": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
