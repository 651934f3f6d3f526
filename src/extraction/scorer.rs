//! Weighted multi-factor relevance scoring (§4.J).
//!
//! Grounded in `original_source/api/services/scorer.py`. Weights sum to 1.0.

use std::sync::LazyLock;

use regex::Regex;

use crate::config::Config;

const TITLE_WEIGHT: f64 = 0.30;
const KEYWORD_WEIGHT: f64 = 0.25;
const YOE_WEIGHT: f64 = 0.20;
const TIER_WEIGHT: f64 = 0.15;
const WORK_MODE_WEIGHT: f64 = 0.10;

const TITLE_KEYWORDS: &[&str] = &[
    "principal",
    "senior",
    "staff",
    "lead",
    "tpm",
    "technical program",
    "program manager",
    "product manager",
];

const AI_PLATFORM_KEYWORDS: &[&str] = &[
    "ai",
    "ml",
    "machine learning",
    "platform",
    "infrastructure",
    "infra",
    "sre",
    "reliability",
    "observability",
    "cloud",
    "data",
    "genai",
    "llm",
    "ops",
    "devops",
];

pub(crate) fn compile_word_boundary_patterns(keywords: &[&str]) -> Vec<Regex> {
    keywords
        .iter()
        .map(|kw| {
            let escaped = regex::escape(kw).replace("\\ ", r"\s+");
            Regex::new(&format!(r"(?i)\b{escaped}\b")).expect("static keyword pattern")
        })
        .collect()
}

static TITLE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| compile_word_boundary_patterns(TITLE_KEYWORDS));
static AI_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| compile_word_boundary_patterns(AI_PLATFORM_KEYWORDS));

pub fn score_title(title: &str) -> f64 {
    let hits = TITLE_PATTERNS.iter().filter(|p| p.is_match(title)).count();
    (hits as f64 / 3.0).min(1.0)
}

pub fn score_keywords(text: &str) -> f64 {
    let hits = AI_PATTERNS.iter().filter(|p| p.is_match(text)).count();
    (hits as f64 / 5.0).min(1.0)
}

pub fn score_yoe(yoe_min: Option<i32>, yoe_max: Option<i32>) -> f64 {
    const TARGET_MIN: i32 = 8;
    const TARGET_MAX: i32 = 15;

    if yoe_min.is_none() && yoe_max.is_none() {
        return 0.5;
    }
    let low = yoe_min.unwrap_or(TARGET_MIN);
    let high = yoe_max.unwrap_or(TARGET_MAX);
    let overlap = (high.min(TARGET_MAX) - low.max(TARGET_MIN)).max(0);
    let span = (high - low).max(1);
    (overlap as f64 / span as f64).min(1.0)
}

pub fn score_company_tier(tier: i32) -> f64 {
    match tier {
        1 => 1.0,
        2 => 0.8,
        _ => 0.6,
    }
}

pub fn score_work_mode(config: &Config, work_mode: Option<&str>) -> f64 {
    let preferred = config.preferred_work_mode.to_lowercase();
    if preferred == "any" {
        return 1.0;
    }
    match work_mode {
        None => 0.5,
        Some(mode) if mode.to_lowercase() == preferred => 1.0,
        Some(_) => 0.2,
    }
}

#[allow(clippy::too_many_arguments)]
pub fn compute_match_score(
    config: &Config,
    title: &str,
    description: &str,
    yoe_min: Option<i32>,
    yoe_max: Option<i32>,
    company_tier: i32,
    work_mode: Option<&str>,
) -> f64 {
    let total = score_title(title) * TITLE_WEIGHT
        + score_keywords(description) * KEYWORD_WEIGHT
        + score_yoe(yoe_min, yoe_max) * YOE_WEIGHT
        + score_company_tier(company_tier) * TIER_WEIGHT
        + score_work_mode(config, work_mode) * WORK_MODE_WEIGHT;

    let clamped = total.clamp(0.0, 1.0);
    (clamped * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    fn test_config() -> Config {
        Config::parse_from(["auros", "--database-url", "postgres://localhost/test"])
    }

    #[test]
    fn title_score_counts_distinct_keyword_hits() {
        assert_eq!(score_title("Senior Staff TPM"), 1.0);
        assert_eq!(score_title("Account Executive"), 0.0);
    }

    #[test]
    fn title_score_does_not_match_substrings() {
        // "program" inside "programming" should not count as "program manager".
        assert_eq!(score_title("Programming Enthusiast"), 0.0);
    }

    #[test]
    fn keyword_score_caps_at_one() {
        let text = "ai ml platform infra sre reliability observability cloud";
        assert_eq!(score_keywords(text), 1.0);
    }

    #[test]
    fn yoe_score_is_neutral_when_unspecified() {
        assert_eq!(score_yoe(None, None), 0.5);
    }

    #[test]
    fn yoe_score_is_full_within_target_band() {
        assert_eq!(score_yoe(Some(8), Some(15)), 1.0);
    }

    #[test]
    fn yoe_score_penalizes_no_overlap() {
        assert_eq!(score_yoe(Some(0), Some(2)), 0.0);
    }

    #[test]
    fn tier_scores_descend_by_tier() {
        assert_eq!(score_company_tier(1), 1.0);
        assert_eq!(score_company_tier(2), 0.8);
        assert_eq!(score_company_tier(3), 0.6);
    }

    #[test]
    fn work_mode_any_preference_is_always_full_score() {
        let config = test_config();
        assert_eq!(score_work_mode(&config, Some("onsite")), 1.0);
    }

    #[test]
    fn work_mode_mismatch_is_penalized_when_preference_set() {
        let config = Config::parse_from([
            "auros",
            "--database-url",
            "postgres://localhost/test",
            "--preferred-work-mode",
            "remote",
        ]);
        assert_eq!(score_work_mode(&config, Some("onsite")), 0.2);
        assert_eq!(score_work_mode(&config, Some("remote")), 1.0);
        assert_eq!(score_work_mode(&config, None), 0.5);
    }

    #[test]
    fn compute_match_score_is_clamped_and_rounded() {
        let config = test_config();
        let score = compute_match_score(
            &config,
            "Principal TPM, AI Platform",
            "We need AI ML platform infra experience",
            Some(9),
            Some(12),
            1,
            Some("remote"),
        );
        assert!((0.0..=1.0).contains(&score));
        assert_eq!(score, (score * 10_000.0).round() / 10_000.0);
    }
}
