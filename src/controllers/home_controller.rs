use axum::response::Json;
use serde_json::{json, Value};

pub async fn index() -> Json<Value> {
    Json(json!({
        "service": "movie-booking-api",
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
