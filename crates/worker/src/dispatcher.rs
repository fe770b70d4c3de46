//! Background analysis-job dispatcher.
//!
//! Polls the `analysis_jobs` queue every `poll_interval` and executes
//! claimed jobs through the orchestrator. Claiming uses `SELECT FOR
//! UPDATE SKIP LOCKED` via [`AnalysisJobRepo::claim_next`], so running
//! several worker processes is safe.

use std::sync::Arc;
use std::time::Duration;

use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

use parlo_analysis::orchestrator::RunOutcome;
use parlo_analysis::AnalysisOrchestrator;
use parlo_db::models::analysis_job::AnalysisJob;
use parlo_db::repositories::AnalysisJobRepo;

/// Background analysis-job dispatcher.
///
/// A single long-lived Tokio task that drains pending analysis jobs one
/// at a time. Runs are cheap (two bounded external calls and a handful of
/// queries), so one job per tick keeps the loop simple; horizontal scale
/// comes from running more worker processes.
pub struct AnalysisJobDispatcher {
    pool: PgPool,
    orchestrator: Arc<AnalysisOrchestrator>,
    poll_interval: Duration,
}

impl AnalysisJobDispatcher {
    /// Create a dispatcher with a custom poll interval.
    pub fn new(
        pool: PgPool,
        orchestrator: Arc<AnalysisOrchestrator>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            pool,
            orchestrator,
            poll_interval,
        }
    }

    /// Run the dispatcher loop until the cancellation token is triggered.
    pub async fn run(&self, cancel: CancellationToken) {
        let mut ticker = tokio::time::interval(self.poll_interval);
        tracing::info!(
            poll_interval_ms = self.poll_interval.as_millis() as u64,
            "Analysis job dispatcher started",
        );

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Analysis job dispatcher shutting down");
                    break;
                }
                _ = ticker.tick() => {
                    match AnalysisJobRepo::claim_next(&self.pool).await {
                        Ok(Some(job)) => self.execute(job).await,
                        Ok(None) => {}
                        Err(e) => {
                            tracing::error!(error = %e, "Failed to claim analysis job");
                        }
                    }
                }
            }
        }
    }

    /// Execute one claimed job and record its terminal status.
    async fn execute(&self, job: AnalysisJob) {
        tracing::info!(job_id = job.id, session_id = job.session_id, "Analysis job claimed");

        let outcome = self
            .orchestrator
            .try_run(job.session_id, job.max_messages.map(i64::from))
            .await;

        let bookkeeping = match outcome {
            Ok(RunOutcome::NoMessages) => {
                // A no-op run still completed — an empty sample is an
                // expected outcome, not a failure.
                tracing::info!(job_id = job.id, "Analysis job completed (no eligible messages)");
                AnalysisJobRepo::complete(&self.pool, job.id).await
            }
            Ok(RunOutcome::Completed { insights, .. }) => {
                tracing::info!(
                    job_id = job.id,
                    insights = insights.len(),
                    "Analysis job completed",
                );
                AnalysisJobRepo::complete(&self.pool, job.id).await
            }
            Err(e) => {
                tracing::error!(job_id = job.id, session_id = job.session_id, error = %e, "Analysis job failed");
                AnalysisJobRepo::fail(&self.pool, job.id, &e.to_string()).await
            }
        };

        if let Err(e) = bookkeeping {
            tracing::error!(job_id = job.id, error = %e, "Failed to record job status");
        }
    }
}
