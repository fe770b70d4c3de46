//! Worker binary: runs migrations, wires the service clients, and drains
//! the analysis-job queue until interrupted.

use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use parlo_analysis::{AnalysisOrchestrator, HttpLanguageDetector, HttpProficiencyEvaluator};
use parlo_events::EventBus;
use parlo_worker::config::WorkerConfig;
use parlo_worker::dispatcher::AnalysisJobDispatcher;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "parlo_worker=debug,parlo_analysis=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = WorkerConfig::from_env();

    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await
        .expect("Failed to connect to PostgreSQL");

    sqlx::migrate!("../../migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    let detector = Arc::new(HttpLanguageDetector::new(
        config.analysis_service_url.clone(),
        config.detector_timeout,
    ));
    let evaluator = Arc::new(HttpProficiencyEvaluator::new(
        config.analysis_service_url.clone(),
        config.evaluator_timeout,
    ));
    let events = Arc::new(EventBus::default());

    let orchestrator = Arc::new(AnalysisOrchestrator::new(
        pool.clone(),
        detector,
        evaluator,
        events,
    ));

    let dispatcher = AnalysisJobDispatcher::new(pool, orchestrator, config.poll_interval);

    let cancel = CancellationToken::new();
    let shutdown = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Shutdown signal received");
            shutdown.cancel();
        }
    });

    tracing::info!(
        analysis_service_url = %config.analysis_service_url,
        "Worker started",
    );

    dispatcher.run(cancel).await;

    tracing::info!("Worker stopped");
}
