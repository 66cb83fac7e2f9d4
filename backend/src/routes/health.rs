use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use crate::AppState;

pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let store = state.greetings.kind.to_string();

    let Some(db) = &state.greetings.db else {
        return (StatusCode::OK, Json(json!({ "status": "ok", "store": store })));
    };

    match sqlx::query("SELECT 1").execute(db).await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({ "status": "ok", "store": store, "db": "connected" })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "error", "store": store, "db": e.to_string() })),
        ),
    }
}
