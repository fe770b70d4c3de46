//! Insight entity model and DTOs.
//!
//! Insights are the audit trail of automated analysis: one row per
//! finding category per orchestrator run. Created only by the insight
//! recorder and never mutated by the pipeline afterwards; the `is_read`
//! flag belongs to the notification/UI layer.

use serde::Serialize;
use sqlx::FromRow;

use parlo_core::types::{DbId, Timestamp};

/// Category value for grammar-pattern findings.
pub const CATEGORY_GRAMMAR_PATTERN: &str = "grammar_pattern";

/// Category value for vocabulary-strength findings.
pub const CATEGORY_VOCABULARY_STRENGTH: &str = "vocabulary_strength";

/// Category value for proficiency suggestions.
pub const CATEGORY_PROFICIENCY_SUGGESTION: &str = "proficiency_suggestion";

/// A row from the `insights` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Insight {
    pub id: DbId,
    pub learner_id: DbId,
    pub session_id: DbId,
    pub category: String,
    pub title: String,
    pub message: String,
    /// Category-specific payload; schema varies by `category`.
    pub data: serde_json::Value,
    pub is_read: bool,
    pub read_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// DTO for recording a new insight.
#[derive(Debug, Clone)]
pub struct NewInsight {
    pub learner_id: DbId,
    pub session_id: DbId,
    pub category: &'static str,
    pub title: String,
    pub message: String,
    pub data: serde_json::Value,
}
