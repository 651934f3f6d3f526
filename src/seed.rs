//! Default company seed list.
//!
//! Grounded in `original_source/api/data/companies.py`.

use sqlx::PgPool;

use crate::error::AppError;
use crate::models::company::CreateCompany;
use crate::models::Company;

struct CompanySeed {
    id: &'static str,
    name: &'static str,
    careers_url: &'static str,
    tier: i32,
}

const DEFAULT_COMPANIES: &[CompanySeed] = &[
    CompanySeed { id: "stripe", name: "Stripe", careers_url: "https://stripe.com/jobs", tier: 2 },
    CompanySeed { id: "airbnb", name: "Airbnb", careers_url: "https://careers.airbnb.com/", tier: 2 },
    CompanySeed { id: "datadog", name: "Datadog", careers_url: "https://careers.datadoghq.com/", tier: 2 },
    CompanySeed { id: "atlassian", name: "Atlassian", careers_url: "https://www.atlassian.com/company/careers", tier: 2 },
    CompanySeed { id: "cloudflare", name: "Cloudflare", careers_url: "https://www.cloudflare.com/careers/jobs/", tier: 2 },
    CompanySeed { id: "gitlab", name: "GitLab", careers_url: "https://about.gitlab.com/jobs/all-jobs/", tier: 2 },
    CompanySeed { id: "hashicorp", name: "HashiCorp", careers_url: "https://www.hashicorp.com/careers", tier: 2 },
    CompanySeed { id: "workday", name: "Workday", careers_url: "https://workday.wd5.myworkdayjobs.com/Workday", tier: 2 },
    CompanySeed { id: "servicenow", name: "ServiceNow", careers_url: "https://careers.servicenow.com/", tier: 2 },
    CompanySeed { id: "snowflake", name: "Snowflake", careers_url: "https://careers.snowflake.com/", tier: 2 },
];

/// Insert the default company list if the table is empty. Idempotent across
/// restarts; never overwrites operator-curated rows.
pub async fn seed_default_companies(pool: &PgPool) -> Result<(), AppError> {
    if Company::count(pool).await? > 0 {
        return Ok(());
    }

    for seed in DEFAULT_COMPANIES {
        Company::create(
            pool,
            CreateCompany {
                id: seed.id.to_string(),
                name: seed.name.to_string(),
                careers_url: seed.careers_url.to_string(),
                tier: seed.tier,
                enabled: true,
            },
        )
        .await?;
    }

    tracing::info!(count = DEFAULT_COMPANIES.len(), "seeded_default_companies");
    Ok(())
}
