//! Prometheus metrics registry.
//!
//! Grounded in `original_source/api/metrics.py` for the metric names, and in
//! `other_examples/.../crates-kalla-ballista-src-runner.rs`'s `RunnerMetrics`
//! for the `prometheus-client` `Registry` wiring.

use std::sync::Arc;

use prometheus_client::encoding::EncodeLabelSet;
use prometheus_client::encoding::text::encode;
use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::family::Family;
use prometheus_client::metrics::gauge::Gauge;
use prometheus_client::registry::Registry;

#[derive(Debug, Clone, PartialEq, Eq, Hash, EncodeLabelSet)]
pub struct ScrapeErrorLabels {
    pub source: String,
}

#[derive(Clone)]
pub struct Metrics {
    pub scans_total: Counter,
    pub scans_running: Gauge,
    pub scrape_errors_total: Family<ScrapeErrorLabels, Counter>,
    pub jobs_found_total: Counter,
    pub jobs_new_total: Counter,
    pub http_requests_total: Counter,
    registry: Arc<Registry>,
}

impl Metrics {
    pub fn new() -> Self {
        let mut registry = Registry::default();

        let scans_total = Counter::default();
        registry.register("auros_scans_total", "Total scans started", scans_total.clone());

        let scans_running = Gauge::default();
        registry.register(
            "auros_scans_running",
            "Number of scans currently running",
            scans_running.clone(),
        );

        let scrape_errors_total = Family::<ScrapeErrorLabels, Counter>::default();
        registry.register(
            "auros_scrape_errors_total",
            "Total scraping errors",
            scrape_errors_total.clone(),
        );

        let jobs_found_total = Counter::default();
        registry.register(
            "auros_jobs_found_total",
            "Total jobs found during scans",
            jobs_found_total.clone(),
        );

        let jobs_new_total = Counter::default();
        registry.register(
            "auros_jobs_new_total",
            "Total new jobs added during scans",
            jobs_new_total.clone(),
        );

        let http_requests_total = Counter::default();
        registry.register(
            "auros_http_requests_total",
            "Total HTTP requests",
            http_requests_total.clone(),
        );

        Self {
            scans_total,
            scans_running,
            scrape_errors_total,
            jobs_found_total,
            jobs_new_total,
            http_requests_total,
            registry: Arc::new(registry),
        }
    }

    pub fn encode(&self) -> String {
        let mut buf = String::new();
        encode(&mut buf, &self.registry).expect("prometheus text encoding never fails");
        buf
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_registered_metric_names() {
        let metrics = Metrics::new();
        metrics.scans_total.inc();
        metrics.scrape_errors_total.get_or_create(&ScrapeErrorLabels { source: "scrape".to_string() }).inc();
        let text = metrics.encode();
        assert!(text.contains("auros_scans_total"));
        assert!(text.contains("auros_scrape_errors_total"));
    }
}
