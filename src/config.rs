use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "auros", about = "Job-discovery scan pipeline")]
pub struct Config {
    /// Database connection URL
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: String,

    /// Listen address
    #[arg(long, env = "LISTEN_ADDR", default_value = "0.0.0.0:8080")]
    pub listen_addr: String,

    /// Run database migrations on startup
    #[arg(long, env = "RUN_MIGRATIONS", default_value = "true")]
    pub run_migrations: bool,

    /// LLM generation base URL
    #[arg(long, env = "OLLAMA_BASE_URL", default_value = "http://localhost:11434")]
    pub ollama_base_url: String,

    /// LLM model name
    #[arg(long, env = "OLLAMA_MODEL", default_value = "qwen2.5-coder:7b")]
    pub ollama_model: String,

    /// Slack incoming webhook URL; notifications are disabled when unset
    #[arg(long, env = "SLACK_WEBHOOK_URL")]
    pub slack_webhook_url: Option<String>,

    /// Minimum match score required to send a Slack notification
    #[arg(long, env = "SLACK_MIN_SCORE", default_value_t = 0.70)]
    pub slack_min_score: f64,

    /// Comma-separated list of hours (0-23) to run a full scan
    #[arg(long, env = "SCAN_SCHEDULE_HOURS", default_value = "6,12,18")]
    pub scan_schedule_hours: String,

    /// IANA timezone the schedule hours are interpreted in
    #[arg(long, env = "SCAN_TIMEZONE", default_value = "America/Chicago")]
    pub scan_timezone: String,

    /// Disable the cron scheduler (scans can still be triggered manually)
    #[arg(long, env = "DISABLE_SCHEDULER", default_value_t = false)]
    pub disable_scheduler: bool,

    /// Minimum politeness delay before a browser-path page fetch (seconds)
    #[arg(long, env = "SCRAPE_DELAY_MIN", default_value_t = 5)]
    pub scrape_delay_min: u64,

    /// Maximum politeness delay before a browser-path page fetch (seconds)
    #[arg(long, env = "SCRAPE_DELAY_MAX", default_value_t = 10)]
    pub scrape_delay_max: u64,

    /// Concurrent description-page fetch semaphore size
    #[arg(long, env = "MAX_CONCURRENT_PAGES", default_value_t = 3)]
    pub max_concurrent_pages: usize,

    /// Preferred work mode for scoring; "any" disables the gate
    #[arg(long, env = "PREFERRED_WORK_MODE", default_value = "any")]
    pub preferred_work_mode: String,

    /// Minimum confidence required to keep a salary estimate
    #[arg(long, env = "MIN_SALARY_CONFIDENCE", default_value_t = 0.60)]
    pub min_salary_confidence: f64,

    /// Third-party ATS hostnames allowed as cross-host links on generic pages
    #[arg(long, env = "ATS_ALLOWED_DOMAINS", value_delimiter = ',', default_values_t = default_ats_domains())]
    pub ats_allowed_domains: Vec<String>,
}

fn default_ats_domains() -> Vec<String> {
    [
        "greenhouse.io",
        "boards.greenhouse.io",
        "boards-api.greenhouse.io",
        "lever.co",
        "jobs.lever.co",
        "api.lever.co",
        "myworkdayjobs.com",
        "workdayjobs.com",
        "ashbyhq.com",
        "rippling.com",
        "jobs.jobvite.com",
        "smartrecruiters.com",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}
