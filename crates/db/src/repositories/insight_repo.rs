//! Repository for the `insights` table.
//!
//! Creation is owned by the analysis pipeline; listing and read toggling
//! are the contract the notification/UI layer depends on.

use sqlx::PgPool;

use parlo_core::types::DbId;

use crate::models::insight::{Insight, NewInsight};

/// Column list for `insights` queries.
const COLUMNS: &str = "\
    id, learner_id, session_id, category, title, message, data, \
    is_read, read_at, created_at";

/// Provides CRUD operations for analysis insights.
pub struct InsightRepo;

impl InsightRepo {
    /// Record a new insight, returning the stored row.
    pub async fn create(pool: &PgPool, input: &NewInsight) -> Result<Insight, sqlx::Error> {
        let query = format!(
            "INSERT INTO insights (learner_id, session_id, category, title, message, data) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Insight>(&query)
            .bind(input.learner_id)
            .bind(input.session_id)
            .bind(input.category)
            .bind(&input.title)
            .bind(&input.message)
            .bind(&input.data)
            .fetch_one(pool)
            .await
    }

    /// List insights for a learner, newest first.
    ///
    /// When `unread_only` is `true`, only insights with `is_read = false`
    /// are returned.
    pub async fn list_for_learner(
        pool: &PgPool,
        learner_id: DbId,
        unread_only: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Insight>, sqlx::Error> {
        let filter = if unread_only {
            "AND is_read = false"
        } else {
            ""
        };
        let query = format!(
            "SELECT {COLUMNS} FROM insights \
             WHERE learner_id = $1 {filter} \
             ORDER BY created_at DESC \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Insight>(&query)
            .bind(learner_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Mark a single insight as read.
    ///
    /// Returns `true` if the insight was found for the given learner and
    /// updated, `false` otherwise.
    pub async fn mark_read(
        pool: &PgPool,
        insight_id: DbId,
        learner_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE insights \
             SET is_read = true, read_at = NOW() \
             WHERE id = $1 AND learner_id = $2 AND is_read = false",
        )
        .bind(insight_id)
        .bind(learner_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Mark all unread insights as read for a learner.
    ///
    /// Returns the number of insights that were marked read.
    pub async fn mark_all_read(pool: &PgPool, learner_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE insights \
             SET is_read = true, read_at = NOW() \
             WHERE learner_id = $1 AND is_read = false",
        )
        .bind(learner_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Get the number of unread insights for a learner.
    pub async fn unread_count(pool: &PgPool, learner_id: DbId) -> Result<i64, sqlx::Error> {
        let count: Option<i64> = sqlx::query_scalar(
            "SELECT COUNT(*) FROM insights WHERE learner_id = $1 AND is_read = false",
        )
        .bind(learner_id)
        .fetch_one(pool)
        .await?;
        Ok(count.unwrap_or(0))
    }
}
