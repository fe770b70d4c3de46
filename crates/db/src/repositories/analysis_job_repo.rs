//! Repository for the `analysis_jobs` queue table.
//!
//! Uses `AnalysisJobStatus` for all status transitions. Claiming relies on
//! `SELECT FOR UPDATE SKIP LOCKED` so that multiple worker processes never
//! double-claim a job.

use sqlx::PgPool;

use parlo_core::types::DbId;

use crate::models::analysis_job::{AnalysisJob, AnalysisJobStatus};

/// Column list for `analysis_jobs` queries.
const COLUMNS: &str = "\
    id, session_id, status, max_messages, error_message, \
    submitted_at, claimed_at, started_at, completed_at";

/// Provides queue operations for background analysis jobs.
pub struct AnalysisJobRepo;

impl AnalysisJobRepo {
    /// Enqueue an analysis run for a session. This is the triggering
    /// interface: callers decide *when* to submit (message-count cadence
    /// or an explicit user request), the worker decides everything else.
    pub async fn submit(
        pool: &PgPool,
        session_id: DbId,
        max_messages: Option<i32>,
    ) -> Result<AnalysisJob, sqlx::Error> {
        let query = format!(
            "INSERT INTO analysis_jobs (session_id, status, max_messages) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AnalysisJob>(&query)
            .bind(session_id)
            .bind(AnalysisJobStatus::Pending.as_str())
            .bind(max_messages)
            .fetch_one(pool)
            .await
    }

    /// Atomically claim the oldest pending job.
    ///
    /// Uses `SELECT FOR UPDATE SKIP LOCKED` to prevent double-claiming
    /// when multiple workers poll concurrently. The claimed job is moved
    /// to `running` with `claimed_at`/`started_at` stamped, since the
    /// worker begins execution immediately after the claim.
    pub async fn claim_next(pool: &PgPool) -> Result<Option<AnalysisJob>, sqlx::Error> {
        let query = format!(
            "UPDATE analysis_jobs \
             SET status = $1, claimed_at = NOW(), started_at = NOW() \
             WHERE id = ( \
                 SELECT id FROM analysis_jobs \
                 WHERE status = $2 \
                 ORDER BY submitted_at ASC \
                 LIMIT 1 \
                 FOR UPDATE SKIP LOCKED \
             ) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AnalysisJob>(&query)
            .bind(AnalysisJobStatus::Running.as_str())
            .bind(AnalysisJobStatus::Pending.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Mark a job as completed.
    pub async fn complete(pool: &PgPool, job_id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE analysis_jobs \
             SET status = $2, completed_at = NOW() \
             WHERE id = $1",
        )
        .bind(job_id)
        .bind(AnalysisJobStatus::Completed.as_str())
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Mark a job as failed with an error message.
    ///
    /// Failed jobs are terminal. The triggering cadence may submit a fresh
    /// job on its next pass; the worker never retries.
    pub async fn fail(pool: &PgPool, job_id: DbId, error: &str) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE analysis_jobs \
             SET status = $2, error_message = $3, completed_at = NOW() \
             WHERE id = $1",
        )
        .bind(job_id)
        .bind(AnalysisJobStatus::Failed.as_str())
        .bind(error)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Find a job by its ID. The web layer polls this to surface run
    /// status next to a session.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<AnalysisJob>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM analysis_jobs WHERE id = $1");
        sqlx::query_as::<_, AnalysisJob>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
