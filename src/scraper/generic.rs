//! Generic HTML-heuristic fallback renderer (§4.F).
//!
//! Grounded in `original_source/api/services/scraper.py`'s
//! `_extract_job_links`, `_looks_like_job_link`, and
//! `_fetch_descriptions_for_links`.
//!
//! The original renders the page with a headless browser to let
//! client-side JavaScript populate the DOM before scraping anchors. No
//! headless-browser crate appears anywhere in this codebase's dependency
//! stack, so this fallback parses the static HTML response with
//! [`scraper`] instead; pages whose job listings are rendered purely
//! client-side will yield no links here. See `DESIGN.md`.

use std::sync::Arc;

use futures::future::join_all;
use reqwest::Client;
use scraper::{Html, Selector};
use tokio::sync::Semaphore;
use url::Url;

use super::{JobLink, MAX_JOBS_PER_COMPANY, ScrapedJob, rate_limit};
use crate::config::Config;
use crate::error::AppError;
use crate::support::text;

const BAD_LINK_TEXT: &[&str] = &["privacy", "cookie", "terms", "policy", "benefits", "equal employment"];
const JOB_HREF_HINTS: &[&str] = &["/jobs/", "/job/", "/careers/", "greenhouse.io", "lever.co", "workdayjobs", "job"];
const JOB_TEXT_HINTS: &[&str] = &["manager", "program", "product", "technical", "tpm", "principal", "senior"];

fn is_allowed_ats_host(host: &str, allowed_domains: &[String]) -> bool {
    allowed_domains.iter().any(|d| host == d.as_str() || host.ends_with(&format!(".{d}")))
}

fn looks_like_job_link(href: &str, text: &str) -> bool {
    let href = href.to_lowercase();
    let text = text.to_lowercase();
    if BAD_LINK_TEXT.iter().any(|bad| text.contains(bad)) {
        return false;
    }
    if JOB_HREF_HINTS.iter().any(|hint| href.contains(hint)) {
        return true;
    }
    JOB_TEXT_HINTS.iter().any(|hint| text.contains(hint))
}

async fn fetch_html(client: &Client, url: &str) -> Result<String, AppError> {
    Ok(client.get(url).send().await?.error_for_status()?.text().await?)
}

pub async fn scrape_links(config: &Config, client: &Client, careers_url: &str) -> Result<Vec<JobLink>, AppError> {
    let html = fetch_html(client, careers_url).await?;
    let base = Url::parse(careers_url).map_err(|e| AppError::Scrape(format!("invalid careers URL: {e}")))?;
    let base_domain = base.host_str().unwrap_or_default();

    let document = Html::parse_document(&html);
    let anchor = Selector::parse("a").expect("static selector");

    let mut seen = std::collections::HashSet::new();
    let mut links = Vec::new();

    for element in document.select(&anchor) {
        let Some(href) = element.value().attr("href") else { continue };
        let link_text: String = element.text().collect::<Vec<_>>().join(" ");
        let link_text = text::normalize(&link_text);
        if href.is_empty() || link_text.len() < 3 {
            continue;
        }
        if href.starts_with("mailto:") || href.starts_with("tel:") {
            continue;
        }

        let resolved = base.join(href).ok().map(|u| u.to_string()).unwrap_or_else(|| href.to_string());
        let resolved_host = Url::parse(&resolved).ok().and_then(|u| u.host_str().map(str::to_string));
        let is_ats_domain = resolved_host
            .as_deref()
            .is_some_and(|host| is_allowed_ats_host(host, &config.ats_allowed_domains));
        if let Some(host) = &resolved_host
            && host != base_domain
            && !is_ats_domain
        {
            continue;
        }

        if !looks_like_job_link(href, &link_text) {
            continue;
        }
        if !seen.insert(resolved.clone()) {
            continue;
        }
        links.push(JobLink { title: link_text, url: resolved });
    }

    Ok(links)
}

pub async fn fetch_page_text(client: &Client, url: &str) -> Result<String, AppError> {
    let html = fetch_html(client, url).await?;
    Ok(text::normalize(&text::strip_html(&html)))
}

pub async fn fetch_descriptions_for_links(
    config: &Config,
    client: &Client,
    links: Vec<JobLink>,
) -> Result<Vec<ScrapedJob>, AppError> {
    if links.is_empty() {
        return Ok(Vec::new());
    }

    let semaphore = Arc::new(Semaphore::new(config.max_concurrent_pages));
    let truncated: Vec<JobLink> = links.into_iter().take(MAX_JOBS_PER_COMPANY).collect();

    let fetches = truncated.into_iter().map(|link| {
        let client = client.clone();
        let semaphore = Arc::clone(&semaphore);
        async move {
            let _permit = semaphore.acquire().await.expect("semaphore never closed");
            rate_limit::sleep(config).await;
            match fetch_page_text(&client, &link.url).await {
                Ok(description) => Some(ScrapedJob { title: link.title, url: link.url, description }),
                Err(err) => {
                    tracing::warn!(url = %link.url, error = %err, "job_fetch_skipped");
                    None
                }
            }
        }
    });

    Ok(join_all(fetches).await.into_iter().flatten().collect())
}

pub async fn scrape_with_descriptions(
    config: &Config,
    client: &Client,
    careers_url: &str,
) -> Result<Vec<ScrapedJob>, AppError> {
    let links = scrape_links(config, client, careers_url).await?;
    fetch_descriptions_for_links(config, client, links).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_policy_links_even_with_job_hint() {
        assert!(!looks_like_job_link("/careers/privacy", "Privacy Policy"));
    }

    #[test]
    fn accepts_known_job_path_hint() {
        assert!(looks_like_job_link("/jobs/123", "Apply now"));
    }

    #[test]
    fn accepts_seniority_text_hint_without_path_hint() {
        assert!(looks_like_job_link("/careers-page", "Senior Backend Engineer"));
    }

    #[test]
    fn rejects_unrelated_link() {
        assert!(!looks_like_job_link("/about", "About us"));
    }

    #[test]
    fn ats_host_allowlist_is_exact_or_subdomain_only() {
        let allowed = vec!["rippling.com".to_string()];
        assert!(is_allowed_ats_host("rippling.com", &allowed));
        assert!(is_allowed_ats_host("boards.rippling.com", &allowed));
        assert!(!is_allowed_ats_host("rippling.com.evil-attacker.example", &allowed));
        assert!(!is_allowed_ats_host("notrippling.com", &allowed));
    }
}
