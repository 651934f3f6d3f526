//! Scan control surface (§4.K route layer).
//!
//! Grounded in `original_source/api/routers/search.py`.

use axum::Json;
use axum::extract::State;
use serde_json::{Value, json};
use uuid::Uuid;

use super::state::AppState;
use crate::controller;
use crate::error::AppError;
use crate::models::ScanState;

pub async fn trigger(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let status = controller::get_scan_status(&state.pool).await?;
    if status.status == "running" {
        return Ok(Json(json!({ "status": "running" })));
    }

    let task = controller::spawn_full_scan_tracked(
        state.pool.clone(),
        state.config.clone(),
        state.llm.clone(),
        state.metrics.clone(),
    );
    let mut tasks = state.scan_tasks.lock().await;
    tasks.retain(|_, t| !t.is_finished());
    tasks.insert(Uuid::new_v4(), task);

    Ok(Json(json!({ "status": "started" })))
}

/// Cancel every tracked background scan task and reset the singleton state
/// back to idle.
pub async fn stop(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let mut tasks = state.scan_tasks.lock().await;
    let mut cancelled = 0;
    for (_, task) in tasks.drain() {
        if !task.is_finished() {
            task.abort();
            cancelled += 1;
        }
    }
    drop(tasks);

    ScanState::reset_to_idle(&state.pool).await?;

    Ok(Json(json!({ "status": "stopped", "tasks_cancelled": cancelled })))
}

pub async fn status(State(state): State<AppState>) -> Result<Json<controller::ScanStatus>, AppError> {
    Ok(Json(controller::get_scan_status(&state.pool).await?))
}
