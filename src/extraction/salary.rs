//! Regex salary extraction with an LLM fallback (§4.H).
//!
//! Grounded in `original_source/api/services/salary.py`.
//!
//! `extract_salary_from_text` reproduces a latent bug from the original: the
//! k-notation patterns' capture groups span only the digits, never the `k`
//! suffix, so `normalize_salary` never sees a string ending in `k` for those
//! matches and returns the bare number instead of multiplying by 1000. See
//! `DESIGN.md`.

use std::sync::LazyLock;

use regex::Regex;

use super::OllamaClient;
use crate::config::Config;
use crate::error::AppError;
use crate::support::json_salvage;

const SALARY_PROMPT_TEMPLATE: &str = r#"You are estimating total compensation for a US tech role.
Return ONLY valid JSON with:
{
  "salary_min": int,
  "salary_max": int,
  "confidence": number
}
Rules:
- Use annual base salary in USD.
- confidence is 0.0 to 1.0.
- If you cannot estimate, return null.

Role Title: {title}
Company: {company}
Job Description:
{description}"#;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SalaryEstimate {
    pub min: i64,
    pub max: i64,
    pub source: SalarySource,
    pub confidence: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SalarySource {
    JobDescription,
    Ai,
}

impl SalarySource {
    pub fn as_str(&self) -> &'static str {
        match self {
            SalarySource::JobDescription => "jd",
            SalarySource::Ai => "ai",
        }
    }
}

static SALARY_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"(?i)\$\s?(\d{2,3}(?:,\d{3})?)\s?[-\x{2013}]\s?\$\s?(\d{2,3}(?:,\d{3})?)").unwrap(),
        Regex::new(r"(?i)(\d{2,3})\s?k\s?[-\x{2013}]\s?(\d{2,3})\s?k").unwrap(),
        Regex::new(r"(?i)\$\s?(\d{2,3})\s?k\s?[-\x{2013}]\s?\$\s?(\d{2,3})\s?k").unwrap(),
    ]
});

pub fn normalize_salary(value: &str) -> Option<i64> {
    let v = value.replace(',', "").to_lowercase();
    let v = v.trim();
    if let Some(stripped) = v.strip_suffix('k') {
        return stripped.parse::<i64>().ok().map(|n| n * 1000);
    }
    v.parse::<i64>().ok()
}

/// Scan free text for an explicit salary range. Returns the first matching
/// pattern, in declared order.
pub fn extract_salary_from_text(text: &str) -> Option<SalaryEstimate> {
    if text.is_empty() {
        return None;
    }

    for pattern in SALARY_PATTERNS.iter() {
        let Some(captures) = pattern.captures(text) else { continue };
        let raw_min = captures.get(1)?.as_str();
        let raw_max = captures.get(2)?.as_str();
        let (Some(min), Some(max)) = (normalize_salary(raw_min), normalize_salary(raw_max)) else {
            continue;
        };
        return Some(SalaryEstimate {
            min,
            max,
            source: SalarySource::JobDescription,
            confidence: 0.9,
        });
    }

    None
}

pub async fn estimate_salary_with_llm(
    llm: &OllamaClient,
    title: &str,
    company: &str,
    description: &str,
) -> Result<Option<SalaryEstimate>, AppError> {
    let prompt = SALARY_PROMPT_TEMPLATE
        .replace("{title}", title)
        .replace("{company}", company)
        .replace("{description}", description);

    let raw = llm.generate_raw(&prompt).await?;
    let Some(parsed) = json_salvage::parse(&raw) else {
        tracing::warn!(%title, %company, raw_len = raw.len(), "llm_salary_parse_failed");
        return Ok(None);
    };

    let (Some(min), Some(max)) = (
        parsed.get("salary_min").and_then(|v| v.as_i64()),
        parsed.get("salary_max").and_then(|v| v.as_i64()),
    ) else {
        return Ok(None);
    };
    let confidence = parsed.get("confidence").and_then(|v| v.as_f64()).unwrap_or(0.0);

    Ok(Some(SalaryEstimate {
        min,
        max,
        source: SalarySource::Ai,
        confidence,
    }))
}

/// Drop estimates whose confidence falls below the configured floor.
pub fn apply_confidence_threshold(config: &Config, estimate: Option<SalaryEstimate>) -> Option<SalaryEstimate> {
    estimate.filter(|e| e.confidence >= config.min_salary_confidence)
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn extracts_dollar_range() {
        let est = extract_salary_from_text("Salary: $150,000 - $200,000 annually").unwrap();
        assert_eq!(est.min, 150_000);
        assert_eq!(est.max, 200_000);
        assert_eq!(est.source, SalarySource::JobDescription);
    }

    #[test]
    fn k_notation_reproduces_the_missing_multiplier_bug() {
        // The regex capture excludes the `k` suffix, so normalize_salary
        // receives "150"/"200", not "150k"/"200k" -- the original bug.
        let est = extract_salary_from_text("Pay range 150k-200k DOE").unwrap();
        assert_eq!(est.min, 150);
        assert_eq!(est.max, 200);
    }

    #[test]
    fn normalize_salary_handles_k_suffix_when_present() {
        assert_eq!(normalize_salary("150k"), Some(150_000));
    }

    #[test]
    fn normalize_salary_handles_plain_digits() {
        assert_eq!(normalize_salary("150,000"), Some(150_000));
    }

    #[test]
    fn no_match_returns_none() {
        assert_eq!(extract_salary_from_text("Competitive compensation"), None);
    }

    #[test]
    fn empty_text_returns_none() {
        assert_eq!(extract_salary_from_text(""), None);
    }

    #[test]
    fn confidence_threshold_drops_low_confidence_estimate() {
        let config = Config::parse_from([
            "auros",
            "--database-url",
            "postgres://localhost/test",
            "--min-salary-confidence",
            "0.75",
        ]);
        let estimate = Some(SalaryEstimate {
            min: 100_000,
            max: 120_000,
            source: SalarySource::Ai,
            confidence: 0.5,
        });
        assert_eq!(apply_confidence_threshold(&config, estimate), None);
    }
}
