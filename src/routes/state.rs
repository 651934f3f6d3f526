use std::collections::HashMap;
use std::sync::Arc;

use sqlx::PgPool;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::config::Config;
use crate::extraction::llm::OllamaClient;
use crate::metrics::Metrics;

/// Shared application state injected into every route.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub llm: Arc<OllamaClient>,
    pub metrics: Arc<Metrics>,
    /// Background scan tasks, keyed by a task id, so `/search/stop` can
    /// cancel an in-flight scan. Mirrors `original_source/api/routers/search.py`'s
    /// module-level `_background_tasks` set.
    pub scan_tasks: Arc<Mutex<HashMap<Uuid, JoinHandle<()>>>>,
}

impl AppState {
    pub fn new(pool: PgPool, config: Arc<Config>, llm: Arc<OllamaClient>, metrics: Arc<Metrics>) -> Self {
        Self {
            pool,
            config,
            llm,
            metrics,
            scan_tasks: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}
