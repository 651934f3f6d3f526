//! Workday CXS API client (§4.E).
//!
//! Grounded in `original_source/api/services/scraper.py`'s
//! `_scrape_workday_links`, `_extract_workday_postings`,
//! `_extract_workday_total`, and `_workday_request`.

use reqwest::Client;
use serde_json::{Value, json};

use super::{JobLink, MAX_JOBS_PER_COMPANY, ats};
use crate::error::AppError;

const PAGE_SIZE: i64 = 50;

fn extract_postings(data: &Value) -> Vec<Value> {
    if let Some(arr) = data.get("jobPostings").and_then(Value::as_array) {
        return arr.clone();
    }
    if let Some(arr) = data.get("jobs").and_then(Value::as_array) {
        return arr.clone();
    }
    if let Some(inner) = data.get("data") {
        if let Some(arr) = inner.get("jobPostings").and_then(Value::as_array) {
            return arr.clone();
        }
        if let Some(arr) = inner.get("jobs").and_then(Value::as_array) {
            return arr.clone();
        }
    }
    Vec::new()
}

fn extract_total(data: &Value) -> Option<i64> {
    for key in ["total", "totalCount"] {
        if let Some(n) = data.get(key).and_then(Value::as_i64) {
            return Some(n);
        }
    }
    if let Some(inner) = data.get("data") {
        for key in ["total", "totalCount"] {
            if let Some(n) = inner.get(key).and_then(Value::as_i64) {
                return Some(n);
            }
        }
    }
    data.get("page").and_then(|p| p.get("total")).and_then(Value::as_i64)
}

async fn workday_request(client: &Client, api_url: &str, payload: &Value) -> Result<Value, AppError> {
    let post = client.post(api_url).json(payload).send().await;
    if let Ok(resp) = post
        && let Ok(resp) = resp.error_for_status()
    {
        return Ok(resp.json().await?);
    }

    let resp = client.get(api_url).query(payload).send().await?.error_for_status()?;
    Ok(resp.json().await?)
}

pub async fn fetch_links(client: &Client, careers_url: &str) -> Result<Vec<JobLink>, AppError> {
    let ctx = ats::parse_workday_context(careers_url)
        .ok_or_else(|| AppError::Scrape("unable to determine Workday context".to_string()))?;

    let base_api = format!("{}/wday/cxs/{}/{}/jobs", ctx.base_url, ctx.tenant, ctx.site);
    let alt_api = ctx
        .locale
        .as_ref()
        .map(|locale| format!("{}/wday/cxs/{}/{}/{}/jobs", ctx.base_url, ctx.tenant, ctx.site, locale));

    let mut links = Vec::new();
    let mut offset: i64 = 0;

    loop {
        let payload = json!({ "limit": PAGE_SIZE, "offset": offset, "appliedFacets": {} });
        let data = match workday_request(client, &base_api, &payload).await {
            Ok(data) => data,
            Err(err) => match &alt_api {
                Some(alt) => workday_request(client, alt, &payload).await?,
                None => return Err(err),
            },
        };

        for job in extract_postings(&data) {
            let title = job
                .get("title")
                .or_else(|| job.get("jobTitle"))
                .and_then(Value::as_str);
            let Some(title) = title else { continue };

            let url = job
                .get("jobPostingUrl")
                .or_else(|| job.get("externalUrl"))
                .or_else(|| job.get("externalURL"))
                .and_then(Value::as_str)
                .map(str::to_string)
                .or_else(|| {
                    job.get("externalPath")
                        .and_then(Value::as_str)
                        .and_then(|path| url::Url::parse(&ctx.base_url).ok()?.join(path).ok())
                        .map(|u| u.to_string())
                });
            let Some(url) = url else { continue };

            links.push(JobLink { title: title.to_string(), url });
        }

        if links.len() >= MAX_JOBS_PER_COMPANY {
            break;
        }

        let total = extract_total(&data);
        offset += PAGE_SIZE;
        if total.is_none_or(|total| offset >= total) {
            break;
        }
    }

    Ok(links)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_postings_from_top_level_key() {
        let data = json!({ "jobPostings": [{"title": "Engineer"}] });
        assert_eq!(extract_postings(&data).len(), 1);
    }

    #[test]
    fn extracts_postings_from_nested_data_key() {
        let data = json!({ "data": { "jobs": [{"title": "Engineer"}] } });
        assert_eq!(extract_postings(&data).len(), 1);
    }

    #[test]
    fn extracts_total_from_page_object() {
        let data = json!({ "page": { "total": 120 } });
        assert_eq!(extract_total(&data), Some(120));
    }

    #[test]
    fn extracts_total_missing_returns_none() {
        assert_eq!(extract_total(&json!({})), None);
    }
}
