use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

use crate::error::AppError;

/// Immutable append-only record of a completed scan.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ScanLog {
    pub id: String,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub companies_scanned: i32,
    pub jobs_found: i32,
    pub jobs_new: i32,
    /// Serialized `Vec<String>` (JSON array), one entry per per-company failure.
    pub errors: String,
}

impl ScanLog {
    pub async fn insert(
        pool: &PgPool,
        id: &str,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
        companies_scanned: i32,
        jobs_found: i32,
        jobs_new: i32,
        errors: &[String],
    ) -> Result<ScanLog, AppError> {
        let errors_json = serde_json::to_string(errors).unwrap_or_else(|_| "[]".to_string());
        let log = sqlx::query_as::<_, ScanLog>(
            "INSERT INTO scan_logs (id, started_at, completed_at, companies_scanned, jobs_found, jobs_new, errors)
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
        )
        .bind(id)
        .bind(started_at)
        .bind(completed_at)
        .bind(companies_scanned)
        .bind(jobs_found)
        .bind(jobs_new)
        .bind(errors_json)
        .fetch_one(pool)
        .await?;
        Ok(log)
    }

    pub async fn recent(pool: &PgPool, limit: i64) -> Result<Vec<ScanLog>, AppError> {
        let logs = sqlx::query_as::<_, ScanLog>(
            "SELECT * FROM scan_logs ORDER BY completed_at DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(pool)
        .await?;
        Ok(logs)
    }
}
