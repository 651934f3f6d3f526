use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::error::AppError;

/// A curated company whose careers page the scan pipeline crawls.
///
/// Mutated only by the scan controller (`scrape_status`/`last_scraped`) and
/// the admin surface (`enabled`).
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Company {
    pub id: String,
    pub name: String,
    pub careers_url: String,
    pub tier: i32,
    pub enabled: bool,
    pub last_scraped: Option<DateTime<Utc>>,
    pub scrape_status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateCompany {
    pub id: String,
    pub name: String,
    pub careers_url: String,
    #[serde(default = "default_tier")]
    pub tier: i32,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_tier() -> i32 {
    2
}

fn default_enabled() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct UpdateCompany {
    pub enabled: Option<bool>,
}

impl Company {
    pub async fn list(pool: &PgPool) -> Result<Vec<Company>, AppError> {
        let companies = sqlx::query_as::<_, Company>("SELECT * FROM companies ORDER BY name")
            .fetch_all(pool)
            .await?;
        Ok(companies)
    }

    pub async fn list_enabled(pool: &PgPool) -> Result<Vec<Company>, AppError> {
        let companies = sqlx::query_as::<_, Company>(
            "SELECT * FROM companies WHERE enabled = true ORDER BY name",
        )
        .fetch_all(pool)
        .await?;
        Ok(companies)
    }

    pub async fn get(pool: &PgPool, id: &str) -> Result<Company, AppError> {
        sqlx::query_as::<_, Company>("SELECT * FROM companies WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Company '{id}' not found")))
    }

    pub async fn count(pool: &PgPool) -> Result<i64, AppError> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM companies")
            .fetch_one(pool)
            .await?;
        Ok(row.0)
    }

    pub async fn create(pool: &PgPool, input: CreateCompany) -> Result<Company, AppError> {
        let company = sqlx::query_as::<_, Company>(
            "INSERT INTO companies (id, name, careers_url, tier, enabled) VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(&input.id)
        .bind(&input.name)
        .bind(&input.careers_url)
        .bind(input.tier)
        .bind(input.enabled)
        .fetch_one(pool)
        .await?;
        Ok(company)
    }

    pub async fn update(pool: &PgPool, id: &str, input: UpdateCompany) -> Result<Company, AppError> {
        let existing = Self::get(pool, id).await?;
        let company = sqlx::query_as::<_, Company>(
            "UPDATE companies SET enabled = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(input.enabled.unwrap_or(existing.enabled))
        .fetch_one(pool)
        .await?;
        Ok(company)
    }

    /// Called exclusively by the scan controller after a scrape attempt.
    pub async fn record_scrape_result(
        pool: &PgPool,
        id: &str,
        status: &str,
    ) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE companies SET scrape_status = $2, last_scraped = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(status)
        .execute(pool)
        .await?;
        Ok(())
    }
}
