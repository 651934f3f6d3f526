use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

use crate::error::AppError;

pub const SCAN_STATE_ID: &str = "current";

/// Singleton row (`id = "current"`) acting as the database-backed mutex for
/// the at-most-one-concurrent-scan invariant. The scan controller is the
/// sole writer.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ScanState {
    pub id: String,
    pub status: String,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub companies_scanned: i32,
    pub jobs_found: i32,
    pub jobs_new: i32,
    pub errors: String,
}

impl ScanState {
    pub fn parsed_errors(&self) -> Vec<String> {
        serde_json::from_str(&self.errors).unwrap_or_default()
    }

    pub async fn current(pool: &PgPool) -> Result<Option<ScanState>, AppError> {
        let state = sqlx::query_as::<_, ScanState>("SELECT * FROM scan_state WHERE id = $1")
            .bind(SCAN_STATE_ID)
            .fetch_optional(pool)
            .await?;
        Ok(state)
    }

    pub async fn is_running(pool: &PgPool) -> Result<bool, AppError> {
        Ok(Self::current(pool)
            .await?
            .is_some_and(|s| s.status == "running"))
    }

    /// `idle|completed -> running`: reset the singleton row to a fresh run.
    /// Upserts because the row may not exist on first boot.
    pub async fn start_running(pool: &PgPool) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO scan_state (id, status, started_at, completed_at, companies_scanned, jobs_found, jobs_new, errors)
             VALUES ($1, 'running', NOW(), NULL, 0, 0, 0, '[]')
             ON CONFLICT (id) DO UPDATE SET
                status = 'running', started_at = NOW(), completed_at = NULL,
                companies_scanned = 0, jobs_found = 0, jobs_new = 0, errors = '[]'",
        )
        .bind(SCAN_STATE_ID)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// `running -> running`: monotonic progress update.
    pub async fn update_progress(
        pool: &PgPool,
        companies_scanned: i32,
        jobs_found: i32,
        jobs_new: i32,
        errors: &[String],
    ) -> Result<(), AppError> {
        let errors_json = serde_json::to_string(errors).unwrap_or_else(|_| "[]".to_string());
        sqlx::query(
            "UPDATE scan_state SET companies_scanned = $2, jobs_found = $3, jobs_new = $4, errors = $5 WHERE id = $1",
        )
        .bind(SCAN_STATE_ID)
        .bind(companies_scanned)
        .bind(jobs_found)
        .bind(jobs_new)
        .bind(errors_json)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// `running -> completed`: terminal transition, regardless of whether
    /// per-company errors were recorded along the way.
    pub async fn complete(
        pool: &PgPool,
        companies_scanned: i32,
        jobs_found: i32,
        jobs_new: i32,
        errors: &[String],
    ) -> Result<(), AppError> {
        let errors_json = serde_json::to_string(errors).unwrap_or_else(|_| "[]".to_string());
        sqlx::query(
            "UPDATE scan_state SET status = 'completed', completed_at = NOW(),
                companies_scanned = $2, jobs_found = $3, jobs_new = $4, errors = $5 WHERE id = $1",
        )
        .bind(SCAN_STATE_ID)
        .bind(companies_scanned)
        .bind(jobs_found)
        .bind(jobs_new)
        .bind(errors_json)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Reset a cancelled scan back to `idle`. Called by the cancelling
    /// authority (the admin surface), never by the controller itself.
    pub async fn reset_to_idle(pool: &PgPool) -> Result<(), AppError> {
        sqlx::query("UPDATE scan_state SET status = 'idle' WHERE id = $1 AND status = 'running'")
            .bind(SCAN_STATE_ID)
            .execute(pool)
            .await?;
        Ok(())
    }
}
