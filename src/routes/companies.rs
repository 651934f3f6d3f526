use axum::Json;
use axum::extract::State;

use super::state::AppState;
use crate::error::AppError;
use crate::models::Company;

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Company>>, AppError> {
    Ok(Json(Company::list(&state.pool).await?))
}
