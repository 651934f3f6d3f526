//! Liveness/readiness and dependency health (§ ambient).
//!
//! Grounded in `original_source/api/routers/health.py`.

use std::time::Duration;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use super::state::AppState;

pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

pub async fn readyz(State(state): State<AppState>) -> impl IntoResponse {
    match sqlx::query_as::<_, (i32,)>("SELECT 1").fetch_one(&state.pool).await {
        Ok(_) => (StatusCode::OK, "ready"),
        Err(_) => (StatusCode::SERVICE_UNAVAILABLE, "not ready"),
    }
}

/// Detailed dependency check: database, the LLM endpoint, and whether Slack
/// notifications are configured.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let db_status = if sqlx::query_as::<_, (i32,)>("SELECT 1").fetch_one(&state.pool).await.is_ok() {
        "ok"
    } else {
        "error"
    };

    let ollama_status = match reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()
    {
        Ok(client) => match client.get(format!("{}/api/tags", state.config.ollama_base_url)).send().await {
            Ok(resp) if resp.status().is_success() => "ok",
            Ok(_) => "error",
            Err(e) if e.is_timeout() => "timeout",
            Err(_) => "error",
        },
        Err(_) => "error",
    };

    let slack_status = if state.config.slack_webhook_url.is_some() { "configured" } else { "disabled" };

    Json(json!({ "db": db_status, "ollama": ollama_status, "slack": slack_status }))
}
