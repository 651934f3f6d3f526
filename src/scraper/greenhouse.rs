//! Greenhouse board API client (§4.E).
//!
//! Grounded in `original_source/api/services/scraper.py`'s
//! `_scrape_greenhouse_jobs` / `_scrape_greenhouse_links`.

use reqwest::Client;
use serde::Deserialize;

use super::{ScrapedJob, ats};
use crate::error::AppError;
use crate::support::text;

#[derive(Debug, Deserialize)]
struct BoardResponse {
    #[serde(default)]
    jobs: Vec<BoardJob>,
}

#[derive(Debug, Deserialize)]
struct BoardJob {
    title: Option<String>,
    absolute_url: Option<String>,
    url: Option<String>,
    content: Option<String>,
    content_text: Option<String>,
}

pub async fn fetch_jobs(client: &Client, careers_url: &str) -> Result<Vec<ScrapedJob>, AppError> {
    let board = ats::extract_greenhouse_board(careers_url)
        .ok_or_else(|| AppError::Scrape("unable to determine Greenhouse board".to_string()))?;

    let api_url = format!("https://boards-api.greenhouse.io/v1/boards/{board}/jobs?content=true");
    let data: BoardResponse = client
        .get(&api_url)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    let jobs = data
        .jobs
        .into_iter()
        .filter_map(|job| {
            let title = job.title?;
            let url = job.absolute_url.or(job.url)?;
            let raw = job.content.or(job.content_text).unwrap_or_default();
            let description = text::normalize(&text::strip_html(&raw));
            Some(ScrapedJob { title, url, description })
        })
        .collect();

    Ok(jobs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_board_response_shape() {
        let json = r#"{"jobs":[
            {"title":"Staff Engineer","absolute_url":"https://boards.greenhouse.io/stripe/jobs/1","content":"<p>Build things</p>"},
            {"title":null,"absolute_url":"https://boards.greenhouse.io/stripe/jobs/2"}
        ]}"#;
        let data: BoardResponse = serde_json::from_str(json).unwrap();
        assert_eq!(data.jobs.len(), 2);
        assert_eq!(data.jobs[0].title.as_deref(), Some("Staff Engineer"));
    }
}
