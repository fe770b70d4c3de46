//! Repository for the `chat_sessions` table.

use sqlx::PgPool;

use parlo_core::types::DbId;

use crate::models::chat_session::ChatSession;

/// Column list for `chat_sessions` queries.
const COLUMNS: &str =
    "id, learner_id, title, target_language, proficiency_level, created_at, updated_at";

/// Provides read access to chat sessions.
pub struct ChatSessionRepo;

impl ChatSessionRepo {
    /// Find a session by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ChatSession>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM chat_sessions WHERE id = $1");
        sqlx::query_as::<_, ChatSession>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List sessions for a learner, most recently updated first.
    pub async fn list_for_learner(
        pool: &PgPool,
        learner_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ChatSession>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM chat_sessions \
             WHERE learner_id = $1 \
             ORDER BY updated_at DESC \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, ChatSession>(&query)
            .bind(learner_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }
}
