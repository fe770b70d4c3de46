//! Chat session entity model.

use serde::Serialize;
use sqlx::FromRow;

use parlo_core::types::{DbId, Timestamp};

/// A row from the `chat_sessions` table.
///
/// One conversation thread between a learner and the AI tutor. Carries its
/// own `proficiency_level` snapshot, which may drift from the learner's
/// canonical level between analysis runs.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ChatSession {
    pub id: DbId,
    pub learner_id: DbId,
    pub title: Option<String>,
    pub target_language: String,
    pub proficiency_level: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
