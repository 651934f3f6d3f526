use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

use crate::error::AppError;

/// A single scraped job posting.
///
/// `url` is the authoritative dedup key (globally unique). Created and
/// status-mutated by the scan controller; `status` is further mutated by
/// the (out-of-scope) admin API.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Job {
    pub id: String,
    pub company_id: String,
    pub title: String,
    pub primary_function: Option<String>,
    pub url: String,
    pub yoe_min: Option<i32>,
    pub yoe_max: Option<i32>,
    pub yoe_source: Option<String>,
    pub salary_min: Option<i32>,
    pub salary_max: Option<i32>,
    pub salary_source: Option<String>,
    pub salary_confidence: Option<f64>,
    pub salary_estimated: bool,
    pub work_mode: Option<String>,
    pub location: Option<String>,
    pub match_score: Option<f64>,
    pub raw_description: Option<String>,
    pub status: String,
    pub first_seen: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
    pub notified: bool,
}

/// Everything the controller needs to persist a freshly-extracted posting.
pub struct CreateJob {
    pub id: String,
    pub company_id: String,
    pub title: String,
    pub primary_function: Option<String>,
    pub url: String,
    pub yoe_min: Option<i32>,
    pub yoe_max: Option<i32>,
    pub yoe_source: Option<String>,
    pub salary_min: Option<i32>,
    pub salary_max: Option<i32>,
    pub salary_source: Option<String>,
    pub salary_confidence: Option<f64>,
    pub salary_estimated: bool,
    pub work_mode: Option<String>,
    pub location: Option<String>,
    pub match_score: Option<f64>,
    pub raw_description: Option<String>,
}

#[derive(Debug, Default, serde::Deserialize)]
pub struct JobFilters {
    pub company_id: Option<String>,
    pub status: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl Job {
    pub async fn list(pool: &PgPool, filters: &JobFilters) -> Result<Vec<Job>, AppError> {
        let per_page = filters.per_page.unwrap_or(50).clamp(1, 100);
        let offset = (filters.page.unwrap_or(1) - 1).max(0) * per_page;

        let jobs = sqlx::query_as::<_, Job>(
            "SELECT * FROM jobs WHERE ($1::text IS NULL OR company_id = $1) AND ($2::text IS NULL OR status = $2) ORDER BY last_seen DESC LIMIT $3 OFFSET $4",
        )
        .bind(&filters.company_id)
        .bind(&filters.status)
        .bind(per_page)
        .bind(offset)
        .fetch_all(pool)
        .await?;
        Ok(jobs)
    }

    pub async fn get(pool: &PgPool, id: &str) -> Result<Job, AppError> {
        sqlx::query_as::<_, Job>("SELECT * FROM jobs WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Job '{id}' not found")))
    }

    pub async fn find_by_url(pool: &PgPool, url: &str) -> Result<Option<Job>, AppError> {
        let job = sqlx::query_as::<_, Job>("SELECT * FROM jobs WHERE url = $1")
            .bind(url)
            .fetch_optional(pool)
            .await?;
        Ok(job)
    }

    /// Bump `last_seen` on an already-known posting, backfilling the
    /// description only if it was previously missing.
    pub async fn touch_seen(pool: &PgPool, id: &str, description: Option<&str>) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE jobs SET last_seen = NOW(), raw_description = COALESCE(raw_description, $2) WHERE id = $1",
        )
        .bind(id)
        .bind(description)
        .execute(pool)
        .await?;
        Ok(())
    }

    pub async fn create(pool: &PgPool, input: CreateJob) -> Result<Job, AppError> {
        let job = sqlx::query_as::<_, Job>(
            "INSERT INTO jobs (
                id, company_id, title, primary_function, url,
                yoe_min, yoe_max, yoe_source,
                salary_min, salary_max, salary_source, salary_confidence, salary_estimated,
                work_mode, location, match_score, raw_description,
                status, notified
            ) VALUES (
                $1, $2, $3, $4, $5,
                $6, $7, $8,
                $9, $10, $11, $12, $13,
                $14, $15, $16, $17,
                'new', false
            ) RETURNING *",
        )
        .bind(&input.id)
        .bind(&input.company_id)
        .bind(&input.title)
        .bind(&input.primary_function)
        .bind(&input.url)
        .bind(input.yoe_min)
        .bind(input.yoe_max)
        .bind(&input.yoe_source)
        .bind(input.salary_min)
        .bind(input.salary_max)
        .bind(&input.salary_source)
        .bind(input.salary_confidence)
        .bind(input.salary_estimated)
        .bind(&input.work_mode)
        .bind(&input.location)
        .bind(input.match_score)
        .bind(&input.raw_description)
        .fetch_one(pool)
        .await?;
        Ok(job)
    }

    pub async fn mark_notified(pool: &PgPool, id: &str) -> Result<(), AppError> {
        sqlx::query("UPDATE jobs SET notified = true WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    pub async fn set_status(pool: &PgPool, id: &str, status: &str) -> Result<Job, AppError> {
        sqlx::query_as::<_, Job>("UPDATE jobs SET status = $2 WHERE id = $1 RETURNING *")
            .bind(id)
            .bind(status)
            .fetch_one(pool)
            .await
            .map_err(AppError::from)
    }
}
