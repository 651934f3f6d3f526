//! Persistence is modeled as an abstract interface over Companies, Jobs,
//! ScanLog, and ScanState. `models/*.rs` are the concrete sqlx-backed
//! implementations; this trait is the formal contract they satisfy, and the
//! seam a future non-Postgres backend would implement against.

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::company::{CreateCompany, UpdateCompany};
use crate::models::job::{CreateJob, JobFilters};
use crate::models::{Company, Job, ScanLog, ScanState};

#[async_trait]
pub trait CompanyRepository {
    async fn list(&self) -> Result<Vec<Company>, AppError>;
    async fn list_enabled(&self) -> Result<Vec<Company>, AppError>;
    async fn get(&self, id: &str) -> Result<Company, AppError>;
    async fn create(&self, input: CreateCompany) -> Result<Company, AppError>;
    async fn update(&self, id: &str, input: UpdateCompany) -> Result<Company, AppError>;
    async fn record_scrape_result(&self, id: &str, status: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait JobRepository {
    async fn list(&self, filters: &JobFilters) -> Result<Vec<Job>, AppError>;
    async fn get(&self, id: &str) -> Result<Job, AppError>;
    async fn find_by_url(&self, url: &str) -> Result<Option<Job>, AppError>;
    async fn touch_seen(&self, id: &str, description: Option<&str>) -> Result<(), AppError>;
    async fn create(&self, input: CreateJob) -> Result<Job, AppError>;
    async fn mark_notified(&self, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait ScanRepository {
    async fn current_state(&self) -> Result<Option<ScanState>, AppError>;
    async fn is_running(&self) -> Result<bool, AppError>;
    async fn start_running(&self) -> Result<(), AppError>;
    async fn update_progress(
        &self,
        companies_scanned: i32,
        jobs_found: i32,
        jobs_new: i32,
        errors: &[String],
    ) -> Result<(), AppError>;
    async fn complete(
        &self,
        companies_scanned: i32,
        jobs_found: i32,
        jobs_new: i32,
        errors: &[String],
    ) -> Result<(), AppError>;
    async fn reset_to_idle(&self) -> Result<(), AppError>;
    #[allow(clippy::too_many_arguments)]
    async fn insert_log(
        &self,
        id: &str,
        started_at: chrono::DateTime<chrono::Utc>,
        completed_at: chrono::DateTime<chrono::Utc>,
        companies_scanned: i32,
        jobs_found: i32,
        jobs_new: i32,
        errors: &[String],
    ) -> Result<ScanLog, AppError>;
    async fn recent_logs(&self, limit: i64) -> Result<Vec<ScanLog>, AppError>;
}

/// sqlx-backed implementation of all three contracts over a single pool.
/// This is the implementation `controller.rs` exercises through the
/// concrete `models/*.rs` functions directly; `PgRepository` exists as the
/// trait-object seam for callers that want to depend on the abstraction
/// (e.g. a future test double) rather than the concrete pool.
pub struct PgRepository(pub sqlx::PgPool);

#[async_trait]
impl CompanyRepository for PgRepository {
    async fn list(&self) -> Result<Vec<Company>, AppError> {
        Company::list(&self.0).await
    }

    async fn list_enabled(&self) -> Result<Vec<Company>, AppError> {
        Company::list_enabled(&self.0).await
    }

    async fn get(&self, id: &str) -> Result<Company, AppError> {
        Company::get(&self.0, id).await
    }

    async fn create(&self, input: CreateCompany) -> Result<Company, AppError> {
        Company::create(&self.0, input).await
    }

    async fn update(&self, id: &str, input: UpdateCompany) -> Result<Company, AppError> {
        Company::update(&self.0, id, input).await
    }

    async fn record_scrape_result(&self, id: &str, status: &str) -> Result<(), AppError> {
        Company::record_scrape_result(&self.0, id, status).await
    }
}

#[async_trait]
impl JobRepository for PgRepository {
    async fn list(&self, filters: &JobFilters) -> Result<Vec<Job>, AppError> {
        Job::list(&self.0, filters).await
    }

    async fn get(&self, id: &str) -> Result<Job, AppError> {
        Job::get(&self.0, id).await
    }

    async fn find_by_url(&self, url: &str) -> Result<Option<Job>, AppError> {
        Job::find_by_url(&self.0, url).await
    }

    async fn touch_seen(&self, id: &str, description: Option<&str>) -> Result<(), AppError> {
        Job::touch_seen(&self.0, id, description).await
    }

    async fn create(&self, input: CreateJob) -> Result<Job, AppError> {
        Job::create(&self.0, input).await
    }

    async fn mark_notified(&self, id: &str) -> Result<(), AppError> {
        Job::mark_notified(&self.0, id).await
    }
}

#[async_trait]
impl ScanRepository for PgRepository {
    async fn current_state(&self) -> Result<Option<ScanState>, AppError> {
        ScanState::current(&self.0).await
    }

    async fn is_running(&self) -> Result<bool, AppError> {
        ScanState::is_running(&self.0).await
    }

    async fn start_running(&self) -> Result<(), AppError> {
        ScanState::start_running(&self.0).await
    }

    async fn update_progress(
        &self,
        companies_scanned: i32,
        jobs_found: i32,
        jobs_new: i32,
        errors: &[String],
    ) -> Result<(), AppError> {
        ScanState::update_progress(&self.0, companies_scanned, jobs_found, jobs_new, errors).await
    }

    async fn complete(
        &self,
        companies_scanned: i32,
        jobs_found: i32,
        jobs_new: i32,
        errors: &[String],
    ) -> Result<(), AppError> {
        ScanState::complete(&self.0, companies_scanned, jobs_found, jobs_new, errors).await
    }

    async fn reset_to_idle(&self) -> Result<(), AppError> {
        ScanState::reset_to_idle(&self.0).await
    }

    async fn insert_log(
        &self,
        id: &str,
        started_at: chrono::DateTime<chrono::Utc>,
        completed_at: chrono::DateTime<chrono::Utc>,
        companies_scanned: i32,
        jobs_found: i32,
        jobs_new: i32,
        errors: &[String],
    ) -> Result<ScanLog, AppError> {
        ScanLog::insert(
            &self.0,
            id,
            started_at,
            completed_at,
            companies_scanned,
            jobs_found,
            jobs_new,
            errors,
        )
        .await
    }

    async fn recent_logs(&self, limit: i64) -> Result<Vec<ScanLog>, AppError> {
        ScanLog::recent(&self.0, limit).await
    }
}
