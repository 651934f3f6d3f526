//! Thin HTTP surface: health/readiness, metrics, scan control, and
//! read-only company/job listings. A full CRUD admin API is out of scope.

pub mod companies;
pub mod health;
pub mod jobs;
pub mod metrics;
pub mod search;
pub mod state;

use axum::Router;
use axum::extract::{Request, State};
use axum::middleware;
use axum::middleware::Next;
use axum::response::Response;
use axum::routing::{get, post};

use crate::auth::require_api_token;
use state::AppState;

/// Count every request the app serves, including `/healthz`/`/metrics`
/// themselves.
async fn count_requests(State(state): State<AppState>, request: Request, next: Next) -> Response {
    state.metrics.http_requests_total.inc();
    next.run(request).await
}

pub fn router(state: AppState) -> Router {
    let guarded = Router::new()
        .route("/search/trigger", post(search::trigger))
        .route("/search/stop", post(search::stop))
        .route("/search/status", get(search::status))
        .route("/health", get(health::health))
        .route("/companies", get(companies::list))
        .route("/jobs", get(jobs::list))
        .route("/jobs/{id}", get(jobs::get))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_api_token));

    Router::new()
        .route("/healthz", get(health::healthz))
        .route("/readyz", get(health::readyz))
        .route("/metrics", get(metrics::metrics))
        .merge(guarded)
        .layer(middleware::from_fn_with_state(state.clone(), count_requests))
        .with_state(state)
}
