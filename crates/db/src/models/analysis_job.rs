//! Analysis job queue model.
//!
//! `analysis_jobs` is the queue table behind fire-and-forget dispatch of
//! proficiency analysis runs. Failed jobs are terminal: retry is the
//! triggering cadence's responsibility on its next pass, never the
//! worker's.

use serde::Serialize;
use sqlx::FromRow;

use parlo_core::types::{DbId, Timestamp};

/// Execution status of an analysis job, stored as TEXT.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisJobStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

impl AnalysisJobStatus {
    /// Database representation.
    pub fn as_str(self) -> &'static str {
        match self {
            AnalysisJobStatus::Pending => "pending",
            AnalysisJobStatus::Running => "running",
            AnalysisJobStatus::Completed => "completed",
            AnalysisJobStatus::Failed => "failed",
        }
    }
}

/// A row from the `analysis_jobs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AnalysisJob {
    pub id: DbId,
    pub session_id: DbId,
    pub status: String,
    /// Optional sample-size override; clamped to [1, 100] at run time.
    pub max_messages: Option<i32>,
    pub error_message: Option<String>,
    pub submitted_at: Timestamp,
    pub claimed_at: Option<Timestamp>,
    pub started_at: Option<Timestamp>,
    pub completed_at: Option<Timestamp>,
}
