use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized")]
    Unauthorized,

    /// A classified scraping failure: missing board/company/tenant, an
    /// exhausted retry, or an upstream parse failure. Recorded per-company;
    /// never aborts a scan.
    #[error("Scrape error: {0}")]
    Scrape(String),

    #[error("HTTP error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Transient network failures (timeout, connection reset, 5xx) are
    /// classified as retryable by `support::retry`.
    pub fn is_transient_network(err: &reqwest::Error) -> bool {
        err.is_timeout() || err.is_connect() || err.status().is_some_and(|s| s.is_server_error())
    }

    /// Retry classifier for the scraping pipeline. A `Scrape` failure may
    /// already be a terminal board/slug-resolution error, but mirrors the
    /// upstream behavior of retrying it anyway at the outer layer; a
    /// `Reqwest` failure is retried only when transient.
    pub fn is_retryable_scrape(err: &AppError) -> bool {
        match err {
            AppError::Scrape(_) => true,
            AppError::Reqwest(e) => Self::is_transient_network(e),
            _ => false,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Database(e) => {
                if let sqlx::Error::Database(db_err) = e
                    && db_err.is_unique_violation()
                {
                    return (
                        StatusCode::CONFLICT,
                        axum::Json(json!({ "error": "Resource already exists" })),
                    )
                        .into_response();
                }
                tracing::error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            AppError::Scrape(msg) => (StatusCode::BAD_GATEWAY, msg.clone()),
            AppError::Reqwest(e) => {
                tracing::error!("Upstream HTTP error: {e}");
                (StatusCode::BAD_GATEWAY, "Upstream request failed".to_string())
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = axum::Json(json!({ "error": message }));
        (status, body).into_response()
    }
}
