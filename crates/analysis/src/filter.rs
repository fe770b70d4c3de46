//! Message filter: selects the sample the evaluator grades.
//!
//! Fetches the most recent learner-authored ordinary messages, restores
//! chronological order, and keeps only those the language detector
//! confirms are in the session's target language. Messages the learner
//! typed in another language (say, asking a question in their native
//! tongue) are noise, not errors, and are dropped silently.

use sqlx::PgPool;

use parlo_core::types::DbId;
use parlo_db::repositories::MessageRepo;

use crate::detector::LanguageDetector;
use crate::evaluator::SampledMessage;

/// Fetch and filter the evaluation sample for a session.
///
/// Returns up to `limit` confirmed target-language messages in
/// chronological order (oldest first). An empty result is a valid,
/// expected outcome.
pub async fn select_candidates(
    pool: &PgPool,
    detector: &dyn LanguageDetector,
    session_id: DbId,
    target_language: &str,
    limit: i64,
) -> Result<Vec<SampledMessage>, sqlx::Error> {
    let mut recent = MessageRepo::recent_learner_messages(pool, session_id, limit).await?;

    // The query returns newest-first; the evaluator reasons about
    // progression over time, so flip to chronological order here, before
    // any further processing.
    recent.reverse();

    let candidates: Vec<SampledMessage> = recent
        .into_iter()
        .map(|m| SampledMessage {
            content: m.content,
            timestamp: m.created_at,
        })
        .collect();

    Ok(retain_target_language(candidates, detector, target_language).await)
}

/// Keep only the messages the detector confirms are in the target
/// language, preserving order.
///
/// A detector failure on one message excludes that message and moves on;
/// a single transient failure must not block the whole run.
pub async fn retain_target_language(
    candidates: Vec<SampledMessage>,
    detector: &dyn LanguageDetector,
    target_language: &str,
) -> Vec<SampledMessage> {
    let mut retained = Vec::with_capacity(candidates.len());

    for candidate in candidates {
        match detector.detect(&candidate.content, target_language).await {
            Ok(detection) if detection.is_target_language => retained.push(candidate),
            Ok(detection) => {
                tracing::debug!(
                    detected_language = %detection.detected_language,
                    target_language,
                    "Skipping message not in target language",
                );
            }
            Err(e) => {
                tracing::warn!(
                    target_language,
                    error = %e,
                    "Language detection failed; excluding message from sample",
                );
            }
        }
    }

    retained
}
