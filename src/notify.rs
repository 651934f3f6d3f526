//! Slack webhook notification sink.
//!
//! Grounded in `original_source/api/services/slack.py`.

use std::time::Duration;

use reqwest::Client;
use serde_json::json;

use crate::config::Config;
use crate::models::Job;

/// POST a preformatted message to the configured Slack incoming webhook.
/// Returns `false` (never an error) when no webhook is configured or the
/// webhook rejects the message -- notification delivery never fails a scan.
pub async fn notify(config: &Config, message: &str) -> bool {
    let Some(webhook_url) = config.slack_webhook_url.as_ref() else {
        return false;
    };

    let client = match Client::builder().timeout(Duration::from_secs(10)).build() {
        Ok(client) => client,
        Err(_) => return false,
    };

    match client.post(webhook_url).json(&json!({ "text": message })).send().await {
        Ok(resp) => matches!(resp.status().as_u16(), 200 | 201 | 202),
        Err(err) => {
            tracing::warn!(error = %err, "slack_notify_failed");
            false
        }
    }
}

/// Render the Slack message body for a freshly matched job.
pub fn format_job_message(company: &str, job: &Job) -> String {
    let salary = match (job.salary_min, job.salary_max, job.salary_source.as_deref()) {
        (Some(min), Some(max), Some(source)) => format!("${}k - ${}k ({source})", min / 1000, max / 1000),
        _ => "Not disclosed".to_string(),
    };
    let score_pct = (job.match_score.unwrap_or(0.0) * 100.0).round();
    let yoe_min = job.yoe_min.map(|n| n.to_string()).unwrap_or_else(|| "?".to_string());
    let yoe_max = job.yoe_max.map(|n| n.to_string()).unwrap_or_else(|| "?".to_string());
    let work_mode = job.work_mode.as_deref().unwrap_or("unclear");

    format!(
        ":briefcase: *New Job Match Found*\n\n\
         *Company:* {company}\n\
         *Title:* {title}\n\
         *Match Score:* {score_pct}% :star:\n\
         *Salary:* {salary}\n\
         *YOE:* {yoe_min}-{yoe_max} years\n\
         *Mode:* {work_mode}\n\n\
         <{url}|View Job Description>",
        title = job.title,
        url = job.url,
    )
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn sample_job() -> Job {
        Job {
            id: "job-1".to_string(),
            company_id: "acme".to_string(),
            title: "Principal TPM".to_string(),
            primary_function: Some("TPM".to_string()),
            url: "https://boards.greenhouse.io/acme/jobs/1".to_string(),
            yoe_min: Some(8),
            yoe_max: Some(12),
            yoe_source: Some("extracted".to_string()),
            salary_min: Some(180_000),
            salary_max: Some(220_000),
            salary_source: Some("jd".to_string()),
            salary_confidence: Some(0.9),
            salary_estimated: false,
            work_mode: Some("remote".to_string()),
            location: Some("Remote".to_string()),
            match_score: Some(0.8421),
            raw_description: None,
            status: "new".to_string(),
            first_seen: Utc::now(),
            last_seen: Utc::now(),
            notified: false,
        }
    }

    #[test]
    fn formats_salary_in_thousands() {
        let message = format_job_message("Acme", &sample_job());
        assert!(message.contains("$180k - $220k (jd)"));
        assert!(message.contains("Principal TPM"));
        assert!(message.contains("84%"));
    }

    #[test]
    fn falls_back_to_not_disclosed_without_salary() {
        let mut job = sample_job();
        job.salary_min = None;
        let message = format_job_message("Acme", &job);
        assert!(message.contains("Not disclosed"));
    }
}
