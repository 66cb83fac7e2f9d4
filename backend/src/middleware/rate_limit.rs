use axum::{
    http::{HeaderMap, StatusCode},
    Json,
};
use serde_json::json;

use crate::AppState;

/// Checks a key-scoped rate limit stored in Redis.
///
/// Uses the INCR + EXPIRE strategy:
/// - Increments a counter for `key`
/// - On first increment, sets TTL to `window_secs`
/// - Returns 429 if counter exceeds `max_attempts`
pub async fn check_rate_limit(
    redis: &mut redis::aio::MultiplexedConnection,
    key: &str,
    max_attempts: u64,
    window_secs: u64,
) -> Result<(), (StatusCode, Json<serde_json::Value>)> {
    let count: u64 = redis::cmd("INCR")
        .arg(key)
        .query_async(redis)
        .await
        .unwrap_or(0);

    if count == 1 {
        // Set TTL only on first increment to avoid resetting the window on each attempt
        let _: Result<(), _> = redis::cmd("EXPIRE")
            .arg(key)
            .arg(window_secs)
            .query_async(redis)
            .await;
    }

    if count > max_attempts {
        return Err((
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({ "success": false, "error": "Too many greetings, try again later" })),
        ));
    }

    Ok(())
}

/// Real client IP from the reverse proxy headers.
/// Priority: X-Real-IP, then the first X-Forwarded-For entry.
pub fn client_ip(headers: &HeaderMap) -> Option<String> {
    if let Some(ip) = headers.get("x-real-ip").and_then(|v| v.to_str().ok()) {
        return Some(ip.trim().to_string());
    }
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|xff| xff.split(',').next())
        .map(|first| first.trim().to_string())
        .filter(|ip| !ip.is_empty())
}

/// Redis key for the per-client submission counter. `None` when the client
/// cannot be identified, in which case no limit applies.
fn submit_rate_key(headers: &HeaderMap) -> Option<String> {
    client_ip(headers).map(|ip| format!("greetings:submit:{ip}"))
}

/// Per-IP hourly limit on greeting submissions. A no-op without Redis.
pub async fn check_submit_rate(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<(), (StatusCode, Json<serde_json::Value>)> {
    let Some(redis) = &state.redis else {
        return Ok(());
    };
    let Some(key) = submit_rate_key(headers) else {
        tracing::debug!("No client IP header; greeting submit not rate limited");
        return Ok(());
    };
    let mut redis = redis.clone();
    check_rate_limit(&mut redis, &key, state.config.submit_rate_limit, 3600).await
}
