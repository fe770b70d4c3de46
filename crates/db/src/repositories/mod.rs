//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod analysis_job_repo;
pub mod chat_session_repo;
pub mod insight_repo;
pub mod learner_repo;
pub mod message_repo;

pub use analysis_job_repo::AnalysisJobRepo;
pub use chat_session_repo::ChatSessionRepo;
pub use insight_repo::InsightRepo;
pub use learner_repo::LearnerRepo;
pub use message_repo::MessageRepo;
