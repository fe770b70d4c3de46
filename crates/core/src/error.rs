//! Domain-level error type shared across the workspace.

use crate::types::DbId;

/// A domain error independent of any transport or storage concern.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// An entity lookup came up empty.
    #[error("{entity} with id {id} not found")]
    NotFound {
        /// Entity kind, e.g. `"learner"` or `"chat session"`.
        entity: &'static str,
        /// Database id that was looked up.
        id: DbId,
    },

    /// Input failed a domain validation rule.
    #[error("Validation error: {0}")]
    Validation(String),

    /// An unexpected internal failure.
    #[error("Internal error: {0}")]
    Internal(String),
}
