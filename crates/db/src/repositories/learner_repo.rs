//! Repository for the `learners` table.

use sqlx::PgPool;

use parlo_core::types::DbId;

use crate::models::learner::Learner;

/// Column list for `learners` queries.
const COLUMNS: &str = "\
    id, display_name, target_language, native_language, proficiency_level, \
    auto_update_proficiency, localize_insights, created_at, updated_at";

/// Provides read access to learner profiles and the single write the
/// analysis pipeline is allowed: advancing `proficiency_level`.
pub struct LearnerRepo;

impl LearnerRepo {
    /// Find a learner by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Learner>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM learners WHERE id = $1");
        sqlx::query_as::<_, Learner>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Set a learner's proficiency level.
    ///
    /// Called only after the transition rules in
    /// `parlo_core::proficiency::maybe_advance` have approved the change,
    /// so every write through here moves the level forward.
    pub async fn set_proficiency_level(
        pool: &PgPool,
        learner_id: DbId,
        level: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE learners \
             SET proficiency_level = $2, updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(learner_id)
        .bind(level)
        .execute(pool)
        .await?;
        Ok(())
    }
}
