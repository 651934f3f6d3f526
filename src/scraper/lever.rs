//! Lever postings API client (§4.E).
//!
//! Grounded in `original_source/api/services/scraper.py`'s
//! `_scrape_lever_jobs` / `_scrape_lever_links`.

use reqwest::Client;
use serde::Deserialize;

use super::{ScrapedJob, ats};
use crate::error::AppError;
use crate::support::text;

#[derive(Debug, Deserialize)]
struct Posting {
    text: Option<String>,
    #[serde(rename = "hostedUrl")]
    hosted_url: Option<String>,
    #[serde(rename = "applyUrl")]
    apply_url: Option<String>,
    #[serde(rename = "descriptionPlain")]
    description_plain: Option<String>,
    description: Option<String>,
}

pub async fn fetch_jobs(client: &Client, careers_url: &str) -> Result<Vec<ScrapedJob>, AppError> {
    let company = ats::extract_lever_company(careers_url)
        .ok_or_else(|| AppError::Scrape("unable to determine Lever company slug".to_string()))?;

    let api_url = format!("https://api.lever.co/v0/postings/{company}");
    let postings: Vec<Posting> = client
        .get(&api_url)
        .query(&[("mode", "json")])
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    let jobs = postings
        .into_iter()
        .filter_map(|job| {
            let title = job.text?;
            let url = job.hosted_url.or(job.apply_url)?;
            let description = job
                .description_plain
                .unwrap_or_else(|| text::strip_html(&job.description.unwrap_or_default()));
            Some(ScrapedJob {
                title,
                url,
                description: text::normalize(&description),
            })
        })
        .collect();

    Ok(jobs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_postings_array() {
        let json = r#"[
            {"text":"Backend Engineer","hostedUrl":"https://jobs.lever.co/datadog/abc","descriptionPlain":"Do backend things"},
            {"text":null,"hostedUrl":"https://jobs.lever.co/datadog/def"}
        ]"#;
        let postings: Vec<Posting> = serde_json::from_str(json).unwrap();
        assert_eq!(postings.len(), 2);
        assert_eq!(postings[0].text.as_deref(), Some("Backend Engineer"));
    }
}
