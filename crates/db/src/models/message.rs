//! Chat message entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use parlo_core::types::{DbId, Timestamp};

/// A row from the `messages` table.
///
/// Immutable once created. `sender` and `category` hold the TEXT values
/// of [`parlo_core::message::SenderRole`] and
/// [`parlo_core::message::MessageCategory`].
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Message {
    pub id: DbId,
    pub session_id: DbId,
    pub sender: String,
    pub category: String,
    pub content: String,
    pub created_at: Timestamp,
}

/// DTO for appending a message to a session.
#[derive(Debug, Deserialize)]
pub struct CreateMessage {
    pub session_id: DbId,
    pub sender: String,
    pub category: String,
    pub content: String,
}
