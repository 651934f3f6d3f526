mod auth;
mod config;
mod controller;
mod db;
mod error;
mod extraction;
mod metrics;
mod models;
mod notify;
mod repository;
mod routes;
mod scheduler;
mod scraper;
mod seed;
mod support;

use std::sync::Arc;

use clap::Parser;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::extraction::llm::OllamaClient;
use crate::metrics::Metrics;
use crate::routes::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("auros=info,tower_http=info")),
        )
        .init();

    let config = Config::parse();

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&config.database_url).await?;

    if config.run_migrations {
        tracing::info!("Running database migrations...");
        db::run_migrations(&pool).await?;
        tracing::info!("Migrations complete");
    }

    seed::seed_default_companies(&pool).await?;

    let config = Arc::new(config);
    let llm = Arc::new(OllamaClient::new(config.ollama_base_url.clone(), config.ollama_model.clone())?);
    let metrics = Arc::new(Metrics::new());

    let _scheduler = scheduler::start(pool.clone(), config.clone(), llm.clone(), metrics.clone()).await?;

    let state = AppState::new(pool, config.clone(), llm, metrics);
    let app = routes::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    tracing::info!("Listening on {}", config.listen_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
