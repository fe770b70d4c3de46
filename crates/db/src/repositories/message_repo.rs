//! Repository for the `messages` table.

use sqlx::PgPool;

use parlo_core::message::{MessageCategory, SenderRole};
use parlo_core::types::DbId;

use crate::models::message::{CreateMessage, Message};

/// Column list for `messages` queries.
const COLUMNS: &str = "id, session_id, sender, category, content, created_at";

/// Provides access to chat messages. Messages are append-only; nothing in
/// this workspace updates or deletes them.
pub struct MessageRepo;

impl MessageRepo {
    /// Append a message to a session.
    pub async fn create(pool: &PgPool, input: &CreateMessage) -> Result<Message, sqlx::Error> {
        let query = format!(
            "INSERT INTO messages (session_id, sender, category, content) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Message>(&query)
            .bind(input.session_id)
            .bind(&input.sender)
            .bind(&input.category)
            .bind(&input.content)
            .fetch_one(pool)
            .await
    }

    /// Fetch the `limit` most recent learner-authored ordinary messages in
    /// a session, newest first.
    ///
    /// Callers that feed the proficiency evaluator must reverse the result
    /// into chronological order; the evaluator reasons about progression
    /// over time.
    pub async fn recent_learner_messages(
        pool: &PgPool,
        session_id: DbId,
        limit: i64,
    ) -> Result<Vec<Message>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM messages \
             WHERE session_id = $1 AND sender = $2 AND category = $3 \
             ORDER BY created_at DESC \
             LIMIT $4"
        );
        sqlx::query_as::<_, Message>(&query)
            .bind(session_id)
            .bind(SenderRole::Learner.as_str())
            .bind(MessageCategory::Ordinary.as_str())
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Count learner-authored ordinary messages in a session. The web
    /// layer uses this for its trigger cadence (e.g. every 10th message).
    pub async fn learner_message_count(
        pool: &PgPool,
        session_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        let count: Option<i64> = sqlx::query_scalar(
            "SELECT COUNT(*) FROM messages \
             WHERE session_id = $1 AND sender = $2 AND category = $3",
        )
        .bind(session_id)
        .bind(SenderRole::Learner.as_str())
        .bind(MessageCategory::Ordinary.as_str())
        .fetch_one(pool)
        .await?;
        Ok(count.unwrap_or(0))
    }
}
