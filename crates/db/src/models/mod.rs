//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A create DTO for inserts where the write path lives in this workspace

pub mod analysis_job;
pub mod chat_session;
pub mod insight;
pub mod learner;
pub mod message;
