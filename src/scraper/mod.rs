//! ATS-aware scraping pipeline (§4 components D-G).
//!
//! `scrape_company_jobs` resolves links only; `scrape_jobs_with_descriptions`
//! additionally fetches and normalizes each posting's body text. Both try the
//! detected ATS's JSON API first and fall back to the generic HTML renderer
//! on any [`AppError::Scrape`].

pub mod ats;
pub mod generic;
pub mod greenhouse;
pub mod lever;
pub mod rate_limit;
pub mod workday;

use std::time::Duration;

use reqwest::Client;

use crate::config::Config;
use crate::error::AppError;
use crate::support::retry::retry_async;

/// A bare title+URL pair resolved from a careers page, before its
/// description has been fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobLink {
    pub title: String,
    pub url: String,
}

/// A fully scraped posting: title, URL, and normalized description text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapedJob {
    pub title: String,
    pub url: String,
    pub description: String,
}

/// Hard cap on postings returned per company, independent of how many the
/// upstream source reports. Protects downstream extraction/scoring from an
/// unbounded single company dominating a scan.
pub const MAX_JOBS_PER_COMPANY: usize = 20;

const HTTP_TIMEOUT: Duration = Duration::from_secs(20);

fn build_client() -> Result<Client, AppError> {
    Client::builder()
        .user_agent("Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36")
        .timeout(HTTP_TIMEOUT)
        .build()
        .map_err(|e| AppError::Scrape(format!("failed to build HTTP client: {e}")))
}

/// Resolve the list of job links a company's careers page currently
/// advertises, trying the detected ATS API before falling back to the
/// generic DOM heuristic.
pub async fn scrape_company_jobs(config: &Config, careers_url: &str) -> Result<Vec<JobLink>, AppError> {
    let client = build_client()?;
    let detected = ats::detect_ats(careers_url);

    let links = retry_async(
        || async {
            match detected {
                Some(ats::Ats::Greenhouse) => match greenhouse::fetch_jobs(&client, careers_url).await {
                    Ok(jobs) => Ok(jobs.into_iter().map(|j| JobLink { title: j.title, url: j.url }).collect()),
                    Err(_) => generic::scrape_links(config, &client, careers_url).await,
                },
                Some(ats::Ats::Lever) => match lever::fetch_jobs(&client, careers_url).await {
                    Ok(jobs) => Ok(jobs.into_iter().map(|j| JobLink { title: j.title, url: j.url }).collect()),
                    Err(_) => generic::scrape_links(config, &client, careers_url).await,
                },
                Some(ats::Ats::Workday) => match workday::fetch_links(&client, careers_url).await {
                    Ok(links) => Ok(links),
                    Err(_) => generic::scrape_links(config, &client, careers_url).await,
                },
                None => generic::scrape_links(config, &client, careers_url).await,
            }
        },
        AppError::is_retryable_scrape,
        3,
        Duration::from_millis(500),
    )
    .await?;

    let mut links = links;
    links.truncate(MAX_JOBS_PER_COMPANY);
    Ok(links)
}

/// Fetch a single posting's normalized body text, honoring the politeness
/// delay before the request.
pub async fn fetch_job_description(config: &Config, url: &str) -> Result<String, AppError> {
    let client = build_client()?;
    retry_async(
        || async {
            rate_limit::sleep(config).await;
            generic::fetch_page_text(&client, url).await
        },
        AppError::is_retryable_scrape,
        3,
        Duration::from_millis(500),
    )
    .await
}

/// Resolve links and fetch descriptions in one pass, using each ATS's
/// native description field when present and falling back to fetching the
/// generic page body otherwise.
pub async fn scrape_jobs_with_descriptions(
    config: &Config,
    careers_url: &str,
) -> Result<Vec<ScrapedJob>, AppError> {
    let client = build_client()?;
    let detected = ats::detect_ats(careers_url);

    let jobs = retry_async(
        || async {
            match detected {
                Some(ats::Ats::Greenhouse) => match greenhouse::fetch_jobs(&client, careers_url).await {
                    Ok(jobs) => Ok(jobs),
                    Err(_) => generic::scrape_with_descriptions(config, &client, careers_url).await,
                },
                Some(ats::Ats::Lever) => match lever::fetch_jobs(&client, careers_url).await {
                    Ok(jobs) => Ok(jobs),
                    Err(_) => generic::scrape_with_descriptions(config, &client, careers_url).await,
                },
                Some(ats::Ats::Workday) => match workday::fetch_links(&client, careers_url).await {
                    Ok(links) => generic::fetch_descriptions_for_links(config, &client, links).await,
                    Err(_) => generic::scrape_with_descriptions(config, &client, careers_url).await,
                },
                None => generic::scrape_with_descriptions(config, &client, careers_url).await,
            }
        },
        AppError::is_retryable_scrape,
        3,
        Duration::from_millis(500),
    )
    .await?;

    let mut jobs = jobs;
    jobs.truncate(MAX_JOBS_PER_COMPANY);
    Ok(jobs)
}
