//! ATS classification and URL parsing (§4.D).
//!
//! Grounded in `original_source/api/services/scraper.py`'s `detect_ats`,
//! `_extract_greenhouse_board`, `_extract_lever_company`, and
//! `_parse_workday_context`.

use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ats {
    Greenhouse,
    Lever,
    Workday,
}

impl Ats {
    pub fn as_str(&self) -> &'static str {
        match self {
            Ats::Greenhouse => "greenhouse",
            Ats::Lever => "lever",
            Ats::Workday => "workday",
        }
    }
}

/// Classify a careers URL into an ATS by host substring. `detect_ats` is
/// injective over the ATS set: a host never matches two variants because
/// the substrings (`greenhouse.io`, `lever.co`, `*workdayjobs.com`) are
/// mutually exclusive.
pub fn detect_ats(careers_url: &str) -> Option<Ats> {
    let host = Url::parse(careers_url).ok()?.host_str()?.to_lowercase();
    if host.contains("greenhouse.io") {
        Some(Ats::Greenhouse)
    } else if host.contains("lever.co") {
        Some(Ats::Lever)
    } else if host.contains("myworkdayjobs.com") || host.contains("workdayjobs.com") {
        Some(Ats::Workday)
    } else {
        None
    }
}

fn path_segments(url: &Url) -> Vec<String> {
    url.path_segments()
        .map(|segs| segs.filter(|s| !s.is_empty()).map(str::to_string).collect())
        .unwrap_or_default()
}

pub fn extract_greenhouse_board(careers_url: &str) -> Option<String> {
    let parsed = Url::parse(careers_url).ok()?;
    let host = parsed.host_str()?.to_lowercase();

    if let Some(value) = parsed.query_pairs().find(|(k, _)| k == "for") {
        return Some(value.1.into_owned());
    }

    let segments = path_segments(&parsed);
    if host.starts_with("boards.") {
        if let Some(first) = segments.first() {
            return Some(first.clone());
        }
    }

    if host.ends_with("greenhouse.io")
        && host != "boards.greenhouse.io"
        && host != "boards.eu.greenhouse.io"
    {
        return host.split('.').next().map(str::to_string);
    }

    None
}

pub fn extract_lever_company(careers_url: &str) -> Option<String> {
    let parsed = Url::parse(careers_url).ok()?;
    let host = parsed.host_str()?.to_lowercase();
    if !host.contains("lever.co") {
        return None;
    }
    path_segments(&parsed).into_iter().next()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkdayContext {
    pub base_url: String,
    pub tenant: String,
    pub site: String,
    pub locale: Option<String>,
}

pub fn parse_workday_context(careers_url: &str) -> Option<WorkdayContext> {
    let parsed = Url::parse(careers_url).ok()?;
    let host = parsed.host_str()?.to_string();
    if !host.contains("workdayjobs") {
        return None;
    }

    let base_url = format!("{}://{}", parsed.scheme(), host);
    let mut tenant = host.split('.').next().unwrap_or(&host).to_string();
    let segments = path_segments(&parsed);

    if let (Some(cxs_idx), true) = (
        segments.iter().position(|s| s == "cxs"),
        segments.iter().any(|s| s == "wday"),
    ) {
        if cxs_idx + 2 < segments.len() {
            tenant = segments[cxs_idx + 1].clone();
            let site = segments[cxs_idx + 2].clone();
            let locale = segments
                .get(cxs_idx + 3)
                .filter(|s| s.as_str() != "jobs")
                .cloned();
            return Some(WorkdayContext {
                base_url,
                tenant,
                site,
                locale,
            });
        }
        return None;
    }

    let (mut locale, mut site) = (None, None);
    if let Some(first) = segments.first() {
        if first.len() == 5 && first.contains('-') {
            locale = Some(first.clone());
            site = segments.get(1).cloned();
        } else {
            site = Some(first.clone());
        }
    }

    site.map(|site| WorkdayContext {
        base_url,
        tenant,
        site,
        locale,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_greenhouse() {
        assert_eq!(detect_ats("https://boards.greenhouse.io/stripe"), Some(Ats::Greenhouse));
    }

    #[test]
    fn detects_lever() {
        assert_eq!(detect_ats("https://jobs.lever.co/datadog"), Some(Ats::Lever));
    }

    #[test]
    fn detects_workday() {
        assert_eq!(
            detect_ats("https://company.wd1.myworkdayjobs.com/en-US/Careers"),
            Some(Ats::Workday)
        );
    }

    #[test]
    fn detects_none_for_unknown_host() {
        assert_eq!(detect_ats("https://example.com/careers"), None);
    }

    #[test]
    fn greenhouse_board_from_path() {
        assert_eq!(
            extract_greenhouse_board("https://boards.greenhouse.io/stripe"),
            Some("stripe".to_string())
        );
    }

    #[test]
    fn greenhouse_board_from_job_path() {
        assert_eq!(
            extract_greenhouse_board("https://boards.greenhouse.io/stripe/jobs/12345"),
            Some("stripe".to_string())
        );
    }

    #[test]
    fn greenhouse_board_from_query_param() {
        assert_eq!(
            extract_greenhouse_board("https://boards.greenhouse.io/embed/job_board?for=airbnb"),
            Some("airbnb".to_string())
        );
    }

    #[test]
    fn greenhouse_board_from_subdomain() {
        assert_eq!(
            extract_greenhouse_board("https://airbnb.greenhouse.io/jobs/1"),
            Some("airbnb".to_string())
        );
    }

    #[test]
    fn lever_company_from_root() {
        assert_eq!(
            extract_lever_company("https://jobs.lever.co/datadog"),
            Some("datadog".to_string())
        );
    }

    #[test]
    fn lever_company_from_job_path() {
        assert_eq!(
            extract_lever_company("https://jobs.lever.co/datadog/abc123"),
            Some("datadog".to_string())
        );
    }

    #[test]
    fn workday_context_with_locale() {
        let ctx = parse_workday_context("https://company.wd1.myworkdayjobs.com/en-US/Careers").unwrap();
        assert_eq!(ctx.tenant, "company");
        assert_eq!(ctx.site, "Careers");
        assert_eq!(ctx.locale, Some("en-US".to_string()));
    }

    #[test]
    fn workday_context_without_locale() {
        let ctx = parse_workday_context("https://company.wd1.myworkdayjobs.com/Careers").unwrap();
        assert_eq!(ctx.site, "Careers");
        assert_eq!(ctx.locale, None);
    }

    #[test]
    fn workday_context_from_api_url() {
        let ctx =
            parse_workday_context("https://company.wd1.myworkdayjobs.com/wday/cxs/company/External/jobs")
                .unwrap();
        assert_eq!(ctx.tenant, "company");
        assert_eq!(ctx.site, "External");
    }

    #[test]
    fn workday_context_none_for_non_workday_host() {
        assert_eq!(parse_workday_context("https://example.com/careers"), None);
    }
}
