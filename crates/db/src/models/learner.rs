//! Learner entity model.
//!
//! The auth/profile subsystem owns account fields (credentials, email
//! verification); this workspace reads the language-learning subset and
//! conditionally writes `proficiency_level`.

use serde::Serialize;
use sqlx::FromRow;

use parlo_core::types::{DbId, Timestamp};

/// A row from the `learners` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Learner {
    pub id: DbId,
    pub display_name: String,
    /// Language the learner is studying, e.g. `"Spanish"`.
    pub target_language: String,
    /// The learner's first language, e.g. `"English"`.
    pub native_language: String,
    /// CEFR code (`"A1"`..`"C2"`) or `NULL` when never assessed. Once set
    /// by the analysis pipeline it only ever moves up.
    pub proficiency_level: Option<String>,
    /// When false, analysis runs still produce insights but must not
    /// touch `proficiency_level`.
    pub auto_update_proficiency: bool,
    /// When true, insight text is requested in `native_language`.
    pub localize_insights: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
