//! Worker configuration loaded from environment variables.

use std::time::Duration;

/// Worker configuration.
///
/// All fields except `database_url` have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// PostgreSQL connection string (required).
    pub database_url: String,
    /// Maximum pool connections (default: `5`).
    pub database_max_connections: u32,
    /// Base URL of the external analysis service
    /// (default: `http://localhost:8090`).
    pub analysis_service_url: String,
    /// Timeout for one language-detection call (default: `10` seconds).
    pub detector_timeout: Duration,
    /// Timeout for one proficiency-evaluation call (default: `60` seconds).
    pub evaluator_timeout: Duration,
    /// How often the dispatcher polls for pending jobs
    /// (default: `1000` milliseconds).
    pub poll_interval: Duration,
}

impl WorkerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                    | Default                 |
    /// |----------------------------|-------------------------|
    /// | `DATABASE_URL`             | (required)              |
    /// | `DATABASE_MAX_CONNECTIONS` | `5`                     |
    /// | `ANALYSIS_SERVICE_URL`     | `http://localhost:8090` |
    /// | `DETECTOR_TIMEOUT_SECS`    | `10`                    |
    /// | `EVALUATOR_TIMEOUT_SECS`   | `60`                    |
    /// | `JOB_POLL_INTERVAL_MS`     | `1000`                  |
    pub fn from_env() -> Self {
        let database_url =
            std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

        let database_max_connections: u32 = std::env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "5".into())
            .parse()
            .expect("DATABASE_MAX_CONNECTIONS must be a valid u32");

        let analysis_service_url = std::env::var("ANALYSIS_SERVICE_URL")
            .unwrap_or_else(|_| "http://localhost:8090".into());

        let detector_timeout_secs: u64 = std::env::var("DETECTOR_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".into())
            .parse()
            .expect("DETECTOR_TIMEOUT_SECS must be a valid u64");

        let evaluator_timeout_secs: u64 = std::env::var("EVALUATOR_TIMEOUT_SECS")
            .unwrap_or_else(|_| "60".into())
            .parse()
            .expect("EVALUATOR_TIMEOUT_SECS must be a valid u64");

        let poll_interval_ms: u64 = std::env::var("JOB_POLL_INTERVAL_MS")
            .unwrap_or_else(|_| "1000".into())
            .parse()
            .expect("JOB_POLL_INTERVAL_MS must be a valid u64");

        Self {
            database_url,
            database_max_connections,
            analysis_service_url,
            detector_timeout: Duration::from_secs(detector_timeout_secs),
            evaluator_timeout: Duration::from_secs(evaluator_timeout_secs),
            poll_interval: Duration::from_millis(poll_interval_ms),
        }
    }
}
