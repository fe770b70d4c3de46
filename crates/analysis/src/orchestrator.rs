//! Analysis orchestrator: the pipeline entry point.
//!
//! Composes the message filter, evaluator call, proficiency transition,
//! and insight recorder for one session. [`AnalysisOrchestrator::run`] is
//! fire-and-forget: the caller (worker, or a spawned task on the chat
//! path) never observes a result; everything lands as side effects and
//! log entries. [`AnalysisOrchestrator::try_run`] is the testable body.

use std::sync::Arc;

use sqlx::PgPool;

use parlo_core::error::CoreError;
use parlo_core::proficiency::{maybe_advance, CefrLevel, LevelTransition, BASELINE_LEVEL};
use parlo_core::types::DbId;
use parlo_db::models::insight::Insight;
use parlo_db::repositories::{ChatSessionRepo, LearnerRepo};
use parlo_events::bus::{EventBus, EVENT_INSIGHT_CREATED, EVENT_PROFICIENCY_ADVANCED};
use parlo_events::LearnerEvent;

use crate::detector::LanguageDetector;
use crate::evaluator::{EvaluationRequest, EvaluatorError, ProficiencyEvaluator};
use crate::filter;
use crate::insights;

/// Default evaluation sample size.
pub const DEFAULT_SAMPLE_SIZE: i64 = 20;

/// Smallest accepted sample-size override.
pub const MIN_SAMPLE_SIZE: i64 = 1;

/// Largest accepted sample-size override.
pub const MAX_SAMPLE_SIZE: i64 = 100;

// ---------------------------------------------------------------------------
// Errors and outcome
// ---------------------------------------------------------------------------

/// Errors that abort an analysis run.
///
/// An evaluator failure aborts with zero side effects: partial or garbled
/// analysis results are worse than no analysis, so nothing is written
/// unless the whole assessment arrived intact.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// The session or learner could not be resolved.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The evaluator call failed (network, status, rejection, malformed).
    #[error("Evaluation failed: {0}")]
    Evaluator(#[from] EvaluatorError),
}

/// What a successful run did.
#[derive(Debug)]
pub enum RunOutcome {
    /// No eligible target-language messages; nothing evaluated, nothing
    /// written. A deliberate no-op, not an error.
    NoMessages,
    /// The pipeline ran to completion.
    Completed {
        transition: LevelTransition,
        insights: Vec<Insight>,
    },
}

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

/// Runs the proficiency-analysis pipeline for one session at a time.
pub struct AnalysisOrchestrator {
    pool: PgPool,
    detector: Arc<dyn LanguageDetector>,
    evaluator: Arc<dyn ProficiencyEvaluator>,
    events: Arc<EventBus>,
}

impl AnalysisOrchestrator {
    /// Create an orchestrator over the shared pool, service clients, and
    /// event bus.
    pub fn new(
        pool: PgPool,
        detector: Arc<dyn LanguageDetector>,
        evaluator: Arc<dyn ProficiencyEvaluator>,
        events: Arc<EventBus>,
    ) -> Self {
        Self {
            pool,
            detector,
            evaluator,
            events,
        }
    }

    /// Fire-and-forget entry point: run the pipeline and swallow any
    /// failure after logging it. The triggering path is typically a
    /// learner sending a chat message; that path must never fail because
    /// background analysis did.
    pub async fn run(&self, session_id: DbId, max_messages: Option<i64>) {
        match self.try_run(session_id, max_messages).await {
            Ok(RunOutcome::NoMessages) => {}
            Ok(RunOutcome::Completed {
                transition,
                insights,
            }) => {
                tracing::info!(
                    session_id,
                    insights = insights.len(),
                    level_changed = transition.level_changed(),
                    "Analysis run completed",
                );
            }
            Err(e) => {
                tracing::error!(session_id, error = %e, "Analysis run failed");
            }
        }
    }

    /// The full pipeline, with every failure surfaced to the caller.
    pub async fn try_run(
        &self,
        session_id: DbId,
        max_messages: Option<i64>,
    ) -> Result<RunOutcome, AnalysisError> {
        let session = ChatSessionRepo::find_by_id(&self.pool, session_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "chat session",
                id: session_id,
            })?;

        let learner = LearnerRepo::find_by_id(&self.pool, session.learner_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "learner",
                id: session.learner_id,
            })?;

        let limit = clamp_sample_size(max_messages);

        let sample = filter::select_candidates(
            &self.pool,
            self.detector.as_ref(),
            session.id,
            &session.target_language,
            limit,
        )
        .await?;

        if sample.is_empty() {
            tracing::info!(
                session_id,
                learner_id = learner.id,
                "No eligible target-language messages; skipping analysis",
            );
            return Ok(RunOutcome::NoMessages);
        }

        let current_level = stored_level(&learner.proficiency_level, learner.id);

        let request = EvaluationRequest {
            messages: sample,
            // A never-assessed learner is graded against the baseline;
            // the baseline itself is never written back.
            current_level: current_level.unwrap_or(BASELINE_LEVEL),
            target_language: session.target_language.clone(),
            native_language: learner.native_language.clone(),
            localize_insights: learner.localize_insights,
        };

        tracing::debug!(
            session_id,
            learner_id = learner.id,
            sample_size = request.messages.len(),
            current_level = %request.current_level,
            "Requesting proficiency evaluation",
        );

        // All-or-nothing: any evaluator failure propagates here, before a
        // single write has happened.
        let assessment = self.evaluator.evaluate(&request).await?;

        let transition = maybe_advance(
            current_level,
            learner.auto_update_proficiency,
            assessment.suggestion(),
        );

        if let Some(new_level) = transition.new_level.filter(|_| transition.level_changed()) {
            LearnerRepo::set_proficiency_level(&self.pool, learner.id, new_level.as_str())
                .await?;

            tracing::info!(
                learner_id = learner.id,
                session_id,
                from = current_level.map(CefrLevel::as_str).unwrap_or("unset"),
                to = new_level.as_str(),
                initial = transition.was_initial_assignment,
                "Proficiency level advanced",
            );

            self.events.publish(
                LearnerEvent::new(EVENT_PROFICIENCY_ADVANCED, learner.id)
                    .with_session(session_id)
                    .with_payload(serde_json::json!({
                        "from": current_level.map(CefrLevel::as_str),
                        "to": new_level.as_str(),
                        "was_initial_assignment": transition.was_initial_assignment,
                    })),
            );
        }

        let drafts = insights::build_insight_drafts(
            learner.id,
            session.id,
            &assessment,
            &transition,
            current_level,
        );

        let created = insights::record_insights(&self.pool, &drafts).await?;

        for insight in &created {
            self.events.publish(
                LearnerEvent::new(EVENT_INSIGHT_CREATED, learner.id)
                    .with_session(session_id)
                    .with_payload(serde_json::json!({
                        "insight_id": insight.id,
                        "category": insight.category,
                    })),
            );
        }

        Ok(RunOutcome::Completed {
            transition,
            insights: created,
        })
    }
}

/// Clamp a sample-size override into `[MIN_SAMPLE_SIZE, MAX_SAMPLE_SIZE]`,
/// defaulting to [`DEFAULT_SAMPLE_SIZE`].
fn clamp_sample_size(requested: Option<i64>) -> i64 {
    requested
        .unwrap_or(DEFAULT_SAMPLE_SIZE)
        .clamp(MIN_SAMPLE_SIZE, MAX_SAMPLE_SIZE)
}

/// Parse the stored proficiency level, failing closed.
///
/// A corrupt value is treated as "never assessed" so the next assessment
/// can repair it; it must never reach an ordering comparison.
fn stored_level(stored: &Option<String>, learner_id: i64) -> Option<CefrLevel> {
    let code = stored.as_deref()?;
    let parsed = CefrLevel::parse(code);
    if parsed.is_none() {
        tracing::warn!(
            learner_id,
            proficiency_level = code,
            "Stored proficiency level is not a CEFR code; treating as unset",
        );
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;

    // -----------------------------------------------------------------------
    // Sample-size clamping
    // -----------------------------------------------------------------------

    #[test]
    fn sample_size_defaults_to_twenty() {
        assert_eq!(clamp_sample_size(None), 20);
    }

    #[test]
    fn sample_size_accepts_the_documented_range() {
        assert_eq!(clamp_sample_size(Some(1)), 1);
        assert_eq!(clamp_sample_size(Some(100)), 100);
        assert_eq!(clamp_sample_size(Some(37)), 37);
    }

    #[test]
    fn sample_size_clamps_out_of_range_overrides() {
        assert_eq!(clamp_sample_size(Some(0)), 1);
        assert_eq!(clamp_sample_size(Some(-5)), 1);
        assert_eq!(clamp_sample_size(Some(10_000)), 100);
    }

    // -----------------------------------------------------------------------
    // Stored-level parsing fails closed
    // -----------------------------------------------------------------------

    #[test]
    fn stored_level_parses_valid_codes() {
        assert_eq!(stored_level(&Some("B2".to_string()), 1), Some(CefrLevel::B2));
    }

    #[test]
    fn stored_level_treats_unknown_codes_as_unset() {
        assert_eq!(stored_level(&Some("expert".to_string()), 1), None);
    }

    #[test]
    fn stored_level_handles_null() {
        assert_eq!(stored_level(&None, 1), None);
    }
}
