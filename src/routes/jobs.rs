use axum::Json;
use axum::extract::{Path, Query, State};

use super::state::AppState;
use crate::error::AppError;
use crate::models::Job;
use crate::models::job::JobFilters;

pub async fn list(State(state): State<AppState>, Query(filters): Query<JobFilters>) -> Result<Json<Vec<Job>>, AppError> {
    Ok(Json(Job::list(&state.pool, &filters).await?))
}

pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Job>, AppError> {
    Ok(Json(Job::get(&state.pool, &id).await?))
}
