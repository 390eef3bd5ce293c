use axum::Json;
use serde_json::json;

pub async fn index_get() -> Json<serde_json::Value> {
    let data = json!({
        "name": "helpy",
        "version": env!("CARGO_PKG_VERSION"),
        "about": "Welcome traveler!"
    });

    Json(data)
}
