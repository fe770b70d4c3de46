//! Insight recorder: turns an assessment into audit records.
//!
//! At most three insights per run, one per finding category. Draft
//! building is pure so the emission rules are testable without a
//! database; persistence is a thin loop over `InsightRepo::create`.

use sqlx::PgPool;

use parlo_core::proficiency::{CefrLevel, LevelTransition};
use parlo_core::types::DbId;
use parlo_db::models::insight::{
    Insight, NewInsight, CATEGORY_GRAMMAR_PATTERN, CATEGORY_PROFICIENCY_SUGGESTION,
    CATEGORY_VOCABULARY_STRENGTH,
};
use parlo_db::repositories::InsightRepo;

use crate::evaluator::Assessment;

/// Title for the grammar-pattern insight.
const TITLE_GRAMMAR: &str = "Grammar Patterns";

/// Title for the vocabulary-strength insight.
const TITLE_VOCABULARY: &str = "Vocabulary Strengths";

/// Title for a learner's first proficiency assessment.
const TITLE_INITIAL_ASSESSMENT: &str = "Initial Proficiency Assessment";

/// Title for every subsequent proficiency suggestion.
const TITLE_LEVEL_UPDATE: &str = "Proficiency Level Update";

/// Build the insight drafts for one completed analysis run.
///
/// Emission rules:
/// * `grammar_pattern` iff the assessment carries grammar findings.
/// * `vocabulary_strength` iff the assessment carries vocabulary findings.
/// * `proficiency_suggestion` iff a suggestion exists AND it is either the
///   initial assignment or differs from the level the learner had before
///   this run, so a gate-rejected suggestion still leaves an audit trail.
///
/// `pre_run_level` is the learner's level as it stood before the
/// transition; `data.current_level` reports the post-transition value,
/// which is what downstream consumers treat as authoritative.
pub fn build_insight_drafts(
    learner_id: DbId,
    session_id: DbId,
    assessment: &Assessment,
    transition: &LevelTransition,
    pre_run_level: Option<CefrLevel>,
) -> Vec<NewInsight> {
    let mut drafts = Vec::new();

    if !assessment.grammar_patterns.is_empty() {
        drafts.push(NewInsight {
            learner_id,
            session_id,
            category: CATEGORY_GRAMMAR_PATTERN,
            title: TITLE_GRAMMAR.to_string(),
            message: assessment
                .grammar_summary
                .clone()
                .unwrap_or_else(|| {
                    "We noticed some recurring grammar patterns in your recent messages."
                        .to_string()
                }),
            data: serde_json::json!({ "patterns": assessment.grammar_patterns }),
        });
    }

    if !assessment.vocabulary_assessment.is_empty() {
        drafts.push(NewInsight {
            learner_id,
            session_id,
            category: CATEGORY_VOCABULARY_STRENGTH,
            title: TITLE_VOCABULARY.to_string(),
            message: assessment
                .vocabulary_summary
                .clone()
                .unwrap_or_else(|| {
                    "Your recent messages show vocabulary strengths worth building on.".to_string()
                }),
            data: serde_json::json!({ "insights": assessment.vocabulary_assessment }),
        });
    }

    if let Some((suggested, confidence)) = assessment.suggestion() {
        let noteworthy = transition.was_initial_assignment || Some(suggested) != pre_run_level;
        if noteworthy {
            let title = if transition.was_initial_assignment {
                TITLE_INITIAL_ASSESSMENT
            } else {
                TITLE_LEVEL_UPDATE
            };

            let message = assessment
                .proficiency_message
                .clone()
                .or_else(|| assessment.reasoning.clone())
                .unwrap_or_else(|| {
                    format!("Based on this conversation, your level looks like {suggested}.")
                });

            let current_level = transition.new_level.unwrap_or(suggested);

            drafts.push(NewInsight {
                learner_id,
                session_id,
                category: CATEGORY_PROFICIENCY_SUGGESTION,
                title: title.to_string(),
                message,
                data: serde_json::json!({
                    "suggested_level": suggested.as_str(),
                    "confidence": confidence,
                    "current_level": current_level.as_str(),
                    "was_initial_assignment": transition.was_initial_assignment,
                    "was_auto_updated": transition.was_auto_updated,
                }),
            });
        }
    }

    drafts
}

/// Persist the drafts, returning the stored rows in creation order.
pub async fn record_insights(
    pool: &PgPool,
    drafts: &[NewInsight],
) -> Result<Vec<Insight>, sqlx::Error> {
    let mut created = Vec::with_capacity(drafts.len());
    for draft in drafts {
        created.push(InsightRepo::create(pool, draft).await?);
    }
    Ok(created)
}
