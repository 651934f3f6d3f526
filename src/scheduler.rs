//! Cron-driven scan trigger (§4.L).
//!
//! Grounded in `original_source/api/scheduler/jobs.py` for the schedule
//! semantics, and in `other_examples/.../crates-rhof-sync-src-lib.rs`'s
//! `maybe_build_scheduler` for the `tokio-cron-scheduler` wiring.

use std::str::FromStr;
use std::sync::Arc;

use sqlx::PgPool;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::config::Config;
use crate::controller;
use crate::error::AppError;
use crate::extraction::llm::OllamaClient;
use crate::metrics::Metrics;

const DEFAULT_HOURS: &[u32] = &[6, 12, 18];

/// Parse a comma-separated hour list, dropping out-of-range or unparsable
/// entries. Falls back to [`DEFAULT_HOURS`] if nothing valid remains.
fn parse_schedule_hours(raw: &str) -> Vec<u32> {
    let mut hours: Vec<u32> = raw
        .split(',')
        .filter_map(|part| part.trim().parse::<u32>().ok())
        .filter(|h| *h < 24)
        .collect();
    hours.sort_unstable();
    hours.dedup();
    if hours.is_empty() {
        DEFAULT_HOURS.to_vec()
    } else {
        hours
    }
}

/// Build a 6-field (sec min hour day month weekday) cron expression firing
/// at minute 0 of every listed hour, every day.
fn build_cron_expression(hours: &[u32]) -> String {
    let hour_list = hours.iter().map(u32::to_string).collect::<Vec<_>>().join(",");
    format!("0 0 {hour_list} * * *")
}

fn resolve_timezone(name: &str) -> chrono_tz::Tz {
    chrono_tz::Tz::from_str(name).unwrap_or_else(|_| {
        tracing::warn!(timezone = %name, "unknown_scan_timezone_falling_back_to_utc");
        chrono_tz::UTC
    })
}

/// Start the cron scheduler, or return `None` when disabled via
/// `DISABLE_SCHEDULER`. The returned [`JobScheduler`] must be kept alive by
/// the caller for the scheduler to keep firing.
pub async fn start(
    pool: PgPool,
    config: Arc<Config>,
    llm: Arc<OllamaClient>,
    metrics: Arc<Metrics>,
) -> Result<Option<JobScheduler>, AppError> {
    if config.disable_scheduler {
        tracing::info!("scheduler_disabled");
        return Ok(None);
    }

    let hours = parse_schedule_hours(&config.scan_schedule_hours);
    let cron_expr = build_cron_expression(&hours);
    let tz = resolve_timezone(&config.scan_timezone);

    let sched = JobScheduler::new()
        .await
        .map_err(|e| AppError::Internal(format!("failed to create scheduler: {e}")))?;

    let job = Job::new_async_tz(cron_expr.as_str(), tz, move |_uuid, _locked| {
        let pool = pool.clone();
        let config = Arc::clone(&config);
        let llm = Arc::clone(&llm);
        let metrics = Arc::clone(&metrics);
        Box::pin(async move {
            tracing::info!("scheduled_scan_triggered");
            controller::spawn_full_scan(pool, config, llm, metrics);
        })
    })
    .map_err(|e| AppError::Internal(format!("failed to build scheduled job for '{cron_expr}': {e}")))?;

    sched
        .add(job)
        .await
        .map_err(|e| AppError::Internal(format!("failed to register scheduled job: {e}")))?;

    sched
        .start()
        .await
        .map_err(|e| AppError::Internal(format!("failed to start scheduler: {e}")))?;

    tracing::info!(cron = %cron_expr, timezone = %config_timezone_name(&tz), "scheduler_started");
    Ok(Some(sched))
}

fn config_timezone_name(tz: &chrono_tz::Tz) -> String {
    tz.name().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_default_hours() {
        assert_eq!(parse_schedule_hours("6,12,18"), vec![6, 12, 18]);
    }

    #[test]
    fn dedups_and_sorts_hours() {
        assert_eq!(parse_schedule_hours("18,6,6,12"), vec![6, 12, 18]);
    }

    #[test]
    fn falls_back_to_default_when_all_entries_invalid() {
        assert_eq!(parse_schedule_hours("nope,99,-1"), vec![6, 12, 18]);
    }

    #[test]
    fn builds_six_field_cron_expression() {
        assert_eq!(build_cron_expression(&[6, 12, 18]), "0 0 6,12,18 * * *");
    }

    #[test]
    fn unknown_timezone_falls_back_to_utc() {
        assert_eq!(resolve_timezone("Not/ARealZone"), chrono_tz::UTC);
    }
}
