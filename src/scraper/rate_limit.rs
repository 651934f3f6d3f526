//! Politeness delay between fetches (§4.G).
//!
//! Grounded in `original_source/api/services/scraper.py`'s `_rate_limit`: a
//! per-request randomized sleep, not a shared token bucket.

use rand::Rng;

use crate::config::Config;

pub async fn sleep(config: &Config) {
    let min = config.scrape_delay_min.min(config.scrape_delay_max) * 1000;
    let max = config.scrape_delay_min.max(config.scrape_delay_max) * 1000;
    let millis = {
        let mut rng = rand::rng();
        rng.random_range(min..=max)
    };
    tokio::time::sleep(std::time::Duration::from_millis(millis)).await;
}
