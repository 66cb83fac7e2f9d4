use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use serde_json::{json, Value};

use crate::{
    middleware::rate_limit::check_submit_rate,
    models::greeting::{AttendanceSummary, GreetingRecord, GreetingSubmission},
    AppState,
};

pub async fn list_greetings(
    State(state): State<AppState>,
) -> Result<Json<Vec<GreetingRecord>>, (StatusCode, Json<Value>)> {
    state
        .greetings
        .reader
        .fetch_all()
        .await
        .map(Json)
        .map_err(|e| {
            tracing::error!("Failed to list greetings: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to load greetings" })),
            )
        })
}

pub async fn create_greeting(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<GreetingSubmission>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)> {
    check_submit_rate(&state, &headers).await?;

    if let Err(e) = body.validate() {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "success": false, "error": e.to_string() })),
        ));
    }

    match state.greetings.writer.submit(&body).await {
        Ok(result) if result.success => {
            Ok((StatusCode::CREATED, Json(json!({ "success": true }))))
        }
        Ok(_) => Err((
            StatusCode::BAD_GATEWAY,
            Json(json!({ "success": false, "error": "Greeting was not accepted" })),
        )),
        Err(e) => {
            tracing::error!("Failed to store greeting: {e}");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "success": false, "error": "Failed to store greeting" })),
            ))
        }
    }
}

pub async fn attendance_summary(
    State(state): State<AppState>,
) -> Result<Json<AttendanceSummary>, (StatusCode, Json<Value>)> {
    let records = state.greetings.reader.fetch_all().await.map_err(|e| {
        tracing::error!("Failed to summarise greetings: {e}");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Failed to load greetings" })),
        )
    })?;

    Ok(Json(AttendanceSummary::from_records(&records)))
}
