//! Scan controller (§4.K): singleton state machine plus per-company and
//! per-job orchestration.
//!
//! Grounded in `original_source/api/services/pipeline.py`.

use std::sync::LazyLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Utc;
use regex::Regex;
use sqlx::PgPool;
use tracing::Instrument;
use uuid::Uuid;

use crate::config::Config;
use crate::error::AppError;
use crate::extraction::{llm::OllamaClient, salary, scorer};
use crate::metrics::{Metrics, ScrapeErrorLabels};
use crate::models::{Company, CreateJob, Job, ScanLog, ScanState};
use crate::notify;
use crate::scraper;

const POTENTIAL_KEYWORDS: &[&str] = &[
    "program",
    "tpm",
    "technical program",
    "product manager",
    "platform",
    "infrastructure",
    "infra",
    "ai",
    "ml",
    "reliability",
    "sre",
    "principal",
    "senior",
];

static POTENTIAL_PATTERNS: LazyLock<Vec<Regex>> =
    LazyLock::new(|| scorer::compile_word_boundary_patterns(POTENTIAL_KEYWORDS));

/// A lightweight title pre-filter applied before spending an LLM call: any
/// posting whose title doesn't hint at the target role family is skipped.
pub fn is_potential_match(title: &str) -> bool {
    POTENTIAL_PATTERNS.iter().any(|p| p.is_match(title))
}

/// Per-scan accumulator, mirroring `pipeline.py`'s `ScanContext`.
struct ScanContext {
    started_at: chrono::DateTime<Utc>,
    companies_scanned: i32,
    jobs_found: i32,
    jobs_new: i32,
    errors: Vec<String>,
}

/// Process-local guard preventing two `run_full_scan` calls from racing each
/// other between the `ScanState::is_running` check and `start_running`
/// write. Does not extend across multiple processes -- see `DESIGN.md`.
static SCAN_LOCK: AtomicBool = AtomicBool::new(false);

struct ScanGuard;

impl Drop for ScanGuard {
    fn drop(&mut self) {
        SCAN_LOCK.store(false, Ordering::SeqCst);
    }
}

fn acquire_local_guard() -> Option<ScanGuard> {
    SCAN_LOCK
        .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
        .is_ok()
        .then_some(ScanGuard)
}

/// Current scan status as returned by the `/search/status` route.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ScanStatus {
    pub status: String,
    pub started_at: Option<chrono::DateTime<Utc>>,
    pub completed_at: Option<chrono::DateTime<Utc>>,
    pub companies_scanned: i32,
    pub jobs_found: i32,
    pub jobs_new: i32,
    pub errors: Vec<String>,
}

pub async fn get_scan_status(pool: &PgPool) -> Result<ScanStatus, AppError> {
    let state = ScanState::current(pool).await?;
    Ok(match state {
        None => ScanStatus {
            status: "idle".to_string(),
            started_at: None,
            completed_at: None,
            companies_scanned: 0,
            jobs_found: 0,
            jobs_new: 0,
            errors: Vec::new(),
        },
        Some(state) => ScanStatus {
            status: state.status.clone(),
            started_at: state.started_at,
            completed_at: state.completed_at,
            companies_scanned: state.companies_scanned,
            jobs_found: state.jobs_found,
            jobs_new: state.jobs_new,
            errors: state.parsed_errors(),
        },
    })
}

/// Process a single scraped posting. Returns `true` if a new job row was
/// inserted. Callers are expected to have already applied
/// [`is_potential_match`] to `scraped.title` (`process_company` filters its
/// job list before calling this).
async fn process_job(
    pool: &PgPool,
    config: &Config,
    llm: &OllamaClient,
    company: &Company,
    scraped: &scraper::ScrapedJob,
) -> Result<bool, AppError> {
    if let Some(existing) = Job::find_by_url(pool, &scraped.url).await? {
        Job::touch_seen(pool, &existing.id, Some(&scraped.description)).await?;
        return Ok(false);
    }

    let extracted = llm.extract_job_info(&scraped.description).await?;

    let mut estimate = salary::extract_salary_from_text(&scraped.description);
    if estimate.is_none() {
        estimate = llm.estimate_salary(&scraped.title, &company.name, &scraped.description).await?;
    }
    let estimate = salary::apply_confidence_threshold(config, estimate);

    let score = scorer::compute_match_score(
        config,
        &scraped.title,
        &scraped.description,
        extracted.yoe_min,
        extracted.yoe_max,
        company.tier,
        Some(extracted.work_mode.as_str()),
    );

    let yoe_source = (extracted.yoe_min.is_some() || extracted.yoe_max.is_some()).then(|| "extracted".to_string());

    let job = Job::create(
        pool,
        CreateJob {
            id: Uuid::new_v4().to_string(),
            company_id: company.id.clone(),
            title: scraped.title.clone(),
            primary_function: Some(extracted.primary_function.clone()),
            url: scraped.url.clone(),
            yoe_min: extracted.yoe_min,
            yoe_max: extracted.yoe_max,
            yoe_source,
            salary_min: estimate.map(|e| e.min as i32),
            salary_max: estimate.map(|e| e.max as i32),
            salary_source: estimate.map(|e| e.source.as_str().to_string()),
            salary_confidence: estimate.map(|e| e.confidence),
            salary_estimated: estimate.is_some_and(|e| e.source == salary::SalarySource::Ai),
            work_mode: Some(extracted.work_mode.clone()),
            location: Some(extracted.location.clone()),
            match_score: Some(score),
            raw_description: Some(scraped.description.clone()),
        },
    )
    .await?;

    if score >= config.slack_min_score {
        let message = notify::format_job_message(&company.name, &job);
        if notify::notify(config, &message).await {
            Job::mark_notified(pool, &job.id).await?;
        }
    }

    Ok(true)
}

struct CompanyScanResult {
    jobs_found: i32,
    jobs_new: i32,
    error: Option<String>,
}

async fn process_company(
    pool: &PgPool,
    config: &Config,
    llm: &OllamaClient,
    metrics: &Metrics,
    ctx: &mut ScanContext,
    company: &Company,
) -> CompanyScanResult {
    tracing::info!(company = %company.name, url = %company.careers_url, "scan_company_started");

    let jobs = match scraper::scrape_jobs_with_descriptions(config, &company.careers_url).await {
        Ok(jobs) => jobs,
        Err(err) => {
            let _ = Company::record_scrape_result(pool, &company.id, "failed").await;
            metrics
                .scrape_errors_total
                .get_or_create(&ScrapeErrorLabels { source: "scrape".to_string() })
                .inc();
            tracing::error!(company = %company.name, error = %err, url = %company.careers_url, "scan_company_failed");
            return CompanyScanResult {
                jobs_found: 0,
                jobs_new: 0,
                error: Some(format!("{}: {err}", company.name)),
            };
        }
    };

    let jobs: Vec<_> = jobs.into_iter().filter(|j| is_potential_match(&j.title)).collect();
    let jobs_found = jobs.len() as i32;
    metrics.jobs_found_total.inc_by(jobs_found as u64);
    ctx.jobs_found += jobs_found;
    if let Err(err) = ScanState::update_progress(pool, ctx.companies_scanned, ctx.jobs_found, ctx.jobs_new, &ctx.errors).await {
        return CompanyScanResult { jobs_found, jobs_new: 0, error: Some(format!("{}: {err}", company.name)) };
    }

    if let Err(err) = Company::record_scrape_result(pool, &company.id, "success").await {
        return CompanyScanResult { jobs_found, jobs_new: 0, error: Some(format!("{}: {err}", company.name)) };
    }
    tracing::info!(company = %company.name, jobs_found, "scan_company_completed");

    let mut jobs_new = 0;
    for scraped in &jobs {
        match process_job(pool, config, llm, company, scraped).await {
            Ok(true) => {
                jobs_new += 1;
                ctx.jobs_new += 1;
                metrics.jobs_new_total.inc();
                if let Err(err) = ScanState::update_progress(pool, ctx.companies_scanned, ctx.jobs_found, ctx.jobs_new, &ctx.errors).await {
                    return CompanyScanResult {
                        jobs_found,
                        jobs_new,
                        error: Some(format!("{}: {err}", company.name)),
                    };
                }
            }
            Ok(false) => {}
            Err(err) => {
                tracing::error!(company = %company.name, error = %err, "scan_company_failed");
                return CompanyScanResult {
                    jobs_found,
                    jobs_new,
                    error: Some(format!("{}: {err}", company.name)),
                };
            }
        }
    }

    CompanyScanResult { jobs_found, jobs_new, error: None }
}

/// Run a full scan across every enabled company. A no-op (returns the
/// current status) if a scan is already running, per the at-most-one
/// invariant enforced by [`ScanState`] and the process-local [`SCAN_LOCK`].
///
/// The first 8 hex characters of the scan id are propagated as a
/// correlation identifier via a `tracing` span entered for the scan's
/// duration, so every log line emitted while it's in flight is enriched
/// with `scan_id` without having to thread it through every call site.
pub async fn run_full_scan(pool: &PgPool, config: &Config, llm: &OllamaClient, metrics: &Metrics) -> Result<ScanStatus, AppError> {
    let Some(_guard) = acquire_local_guard() else {
        return get_scan_status(pool).await;
    };
    if ScanState::is_running(pool).await? {
        return get_scan_status(pool).await;
    }

    let scan_id = Uuid::new_v4().to_string();
    let span = tracing::info_span!("scan", scan_id = %&scan_id[..8]);

    metrics.scans_total.inc();
    metrics.scans_running.inc();
    let result = run_full_scan_inner(pool, config, llm, metrics, scan_id).instrument(span).await;
    metrics.scans_running.dec();
    result
}

async fn run_full_scan_inner(
    pool: &PgPool,
    config: &Config,
    llm: &OllamaClient,
    metrics: &Metrics,
    scan_id: String,
) -> Result<ScanStatus, AppError> {
    let started_at = Utc::now();
    ScanState::start_running(pool).await?;
    tracing::info!("scan_started");

    let companies = Company::list_enabled(pool).await?;
    let mut ctx = ScanContext {
        started_at,
        companies_scanned: 0,
        jobs_found: 0,
        jobs_new: 0,
        errors: Vec::new(),
    };
    ScanState::update_progress(pool, ctx.companies_scanned, ctx.jobs_found, ctx.jobs_new, &ctx.errors).await?;

    for company in &companies {
        let result = process_company(pool, config, llm, metrics, &mut ctx, company).await;
        ctx.companies_scanned += 1;
        if let Some(error) = result.error {
            ctx.errors.push(error);
        }
        ScanState::update_progress(pool, ctx.companies_scanned, ctx.jobs_found, ctx.jobs_new, &ctx.errors).await?;
    }

    ScanState::complete(pool, ctx.companies_scanned, ctx.jobs_found, ctx.jobs_new, &ctx.errors).await?;

    ScanLog::insert(
        pool,
        &scan_id,
        ctx.started_at,
        Utc::now(),
        ctx.companies_scanned,
        ctx.jobs_found,
        ctx.jobs_new,
        &ctx.errors,
    )
    .await?;

    tracing::info!(
        companies_scanned = ctx.companies_scanned,
        jobs_found = ctx.jobs_found,
        jobs_new = ctx.jobs_new,
        error_count = ctx.errors.len(),
        "scan_completed"
    );

    get_scan_status(pool).await
}

/// Spawn a full scan on a background task, returning immediately. Used by
/// the cron scheduler, which has no caller waiting on the task handle.
pub fn spawn_full_scan(pool: PgPool, config: Arc<Config>, llm: Arc<OllamaClient>, metrics: Arc<Metrics>) {
    tokio::spawn(async move {
        if let Err(err) = run_full_scan(&pool, &config, &llm, &metrics).await {
            tracing::error!(error = %err, "scan_task_failed");
        }
    });
}

/// Same as [`spawn_full_scan`] but returns the task handle, so a caller (the
/// manual trigger route) can register it for later cancellation.
pub fn spawn_full_scan_tracked(
    pool: PgPool,
    config: Arc<Config>,
    llm: Arc<OllamaClient>,
    metrics: Arc<Metrics>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        if let Err(err) = run_full_scan(&pool, &config, &llm, &metrics).await {
            tracing::error!(error = %err, "scan_task_failed");
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn potential_match_accepts_program_role_titles() {
        assert!(is_potential_match("Senior Technical Program Manager"));
        assert!(is_potential_match("Principal Platform Engineer"));
    }

    #[test]
    fn potential_match_rejects_unrelated_titles() {
        assert!(!is_potential_match("Retail Store Associate"));
    }

    #[test]
    fn local_guard_is_exclusive() {
        let first = acquire_local_guard();
        assert!(first.is_some());
        assert!(acquire_local_guard().is_none());
        drop(first);
        assert!(acquire_local_guard().is_some());
    }
}
