//! Proficiency evaluator client.
//!
//! Wraps the external analysis service's `/evaluate-proficiency` endpoint.
//! Every failure mode (network, non-2xx status, rejection, malformed
//! payload) surfaces as a tagged [`EvaluatorError`] so the orchestrator
//! can apply its all-or-nothing policy: on any failure, nothing is
//! written.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use parlo_core::proficiency::CefrLevel;
use parlo_core::types::Timestamp;

/// Default request timeout for an evaluation call. Evaluation is an LLM
/// round-trip over a batch of messages, so this is much longer than the
/// per-message detection timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// One message in the evaluation sample.
#[derive(Debug, Clone, Serialize)]
pub struct SampledMessage {
    pub content: String,
    pub timestamp: Timestamp,
}

/// Everything the evaluator needs to grade a batch of learner messages.
#[derive(Debug, Clone)]
pub struct EvaluationRequest {
    /// Validated target-language messages in chronological order.
    pub messages: Vec<SampledMessage>,
    /// The learner's current level, or the baseline default for a
    /// never-assessed learner (grading context only).
    pub current_level: CefrLevel,
    pub target_language: String,
    pub native_language: String,
    /// When true the service produces explanatory text in
    /// `native_language`. Passed through unchanged; this workspace never
    /// translates.
    pub localize_insights: bool,
}

// ---------------------------------------------------------------------------
// Findings
// ---------------------------------------------------------------------------

/// A recurring grammar pattern observed across the sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrammarPattern {
    /// Short name of the pattern, e.g. `"subjunctive after ojalá"`.
    pub pattern: String,
    pub description: Option<String>,
    #[serde(default)]
    pub examples: Vec<String>,
}

/// A vocabulary strength observed across the sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VocabularyInsight {
    /// What the learner handles well, e.g. `"idiomatic food vocabulary"`.
    pub strength: String,
    #[serde(default)]
    pub examples: Vec<String>,
}

// ---------------------------------------------------------------------------
// Assessment
// ---------------------------------------------------------------------------

/// A validated evaluator assessment.
///
/// `suggested_level` and `confidence` are either both usable or the
/// suggestion is absent. [`parse_assessment`] enforces the pairing, so
/// [`suggestion`](Assessment::suggestion) is the only accessor downstream
/// code needs.
#[derive(Debug, Clone, Default)]
pub struct Assessment {
    pub suggested_level: Option<CefrLevel>,
    pub confidence: Option<f64>,
    pub grammar_patterns: Vec<GrammarPattern>,
    pub vocabulary_assessment: Vec<VocabularyInsight>,
    pub grammar_summary: Option<String>,
    pub vocabulary_summary: Option<String>,
    pub reasoning: Option<String>,
    /// User-facing text for the proficiency insight, when the service
    /// provides one.
    pub proficiency_message: Option<String>,
}

impl Assessment {
    /// The level suggestion with its confidence, when both are present.
    pub fn suggestion(&self) -> Option<(CefrLevel, f64)> {
        self.suggested_level.zip(self.confidence)
    }
}

// ---------------------------------------------------------------------------
// Wire format
// ---------------------------------------------------------------------------

/// Raw `{success, data?, error?, status?}` envelope from the service.
#[derive(Debug, Deserialize)]
struct RawResponse {
    success: bool,
    data: Option<RawAssessment>,
    error: Option<String>,
    status: Option<String>,
}

/// Assessment payload exactly as the service sends it, before validation.
#[derive(Debug, Deserialize)]
pub struct RawAssessment {
    pub suggested_level: Option<String>,
    pub confidence: Option<f64>,
    #[serde(default)]
    pub grammar_patterns: Vec<GrammarPattern>,
    #[serde(default)]
    pub vocabulary_assessment: Vec<VocabularyInsight>,
    pub grammar_summary: Option<String>,
    pub vocabulary_summary: Option<String>,
    pub reasoning: Option<String>,
    pub proficiency_message: Option<String>,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from the evaluation layer. The orchestrator treats every
/// variant identically (abort without mutation); the split exists for
/// diagnosis.
#[derive(Debug, thiserror::Error)]
pub enum EvaluatorError {
    /// The HTTP request itself failed (network, DNS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service returned a non-2xx status code.
    #[error("Evaluation service error ({status}): {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The service answered but declined the evaluation
    /// (`success = false`).
    #[error("Evaluation rejected: {0}")]
    Rejected(String),

    /// The response decoded but violates the schema (e.g. a suggested
    /// level without a confidence score).
    #[error("Malformed evaluation response: {0}")]
    Malformed(String),
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a raw assessment payload.
///
/// Rules:
/// * `suggested_level` without `confidence` is malformed: a gate cannot
///   be applied to an unscored suggestion. (`confidence` alone is fine.)
/// * `confidence` outside `[0.0, 1.0]` is malformed.
/// * A `suggested_level` that is not a CEFR code degrades to "no
///   suggestion" with a warning; the grammar/vocabulary findings are
///   still usable, so the response is not discarded.
pub fn parse_assessment(raw: RawAssessment) -> Result<Assessment, EvaluatorError> {
    if raw.suggested_level.is_some() && raw.confidence.is_none() {
        return Err(EvaluatorError::Malformed(
            "suggested_level present without confidence".to_string(),
        ));
    }

    if let Some(confidence) = raw.confidence {
        if !(0.0..=1.0).contains(&confidence) {
            return Err(EvaluatorError::Malformed(format!(
                "confidence {confidence} outside [0.0, 1.0]"
            )));
        }
    }

    let suggested_level = match raw.suggested_level.as_deref() {
        Some(code) => {
            let parsed = CefrLevel::parse(code);
            if parsed.is_none() {
                tracing::warn!(
                    suggested_level = code,
                    "Evaluator suggested an unknown CEFR code; treating as no suggestion",
                );
            }
            parsed
        }
        None => None,
    };

    Ok(Assessment {
        // Drop the confidence along with an unusable suggestion so the
        // pair stays consistent.
        confidence: suggested_level.and(raw.confidence),
        suggested_level,
        grammar_patterns: raw.grammar_patterns,
        vocabulary_assessment: raw.vocabulary_assessment,
        grammar_summary: raw.grammar_summary,
        vocabulary_summary: raw.vocabulary_summary,
        reasoning: raw.reasoning,
        proficiency_message: raw.proficiency_message,
    })
}

// ---------------------------------------------------------------------------
// Contract + HTTP implementation
// ---------------------------------------------------------------------------

/// Grades a batch of learner messages.
#[async_trait]
pub trait ProficiencyEvaluator: Send + Sync {
    /// Evaluate the sample and return a validated assessment.
    async fn evaluate(&self, request: &EvaluationRequest) -> Result<Assessment, EvaluatorError>;
}

/// HTTP client for the analysis service's `/evaluate-proficiency`
/// endpoint.
pub struct HttpProficiencyEvaluator {
    client: reqwest::Client,
    base_url: String,
}

impl HttpProficiencyEvaluator {
    /// Create an evaluator client with an explicit per-request timeout.
    ///
    /// * `base_url` - analysis service base URL, e.g. `http://host:8090`.
    pub fn new(base_url: String, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self { client, base_url }
    }
}

#[async_trait]
impl ProficiencyEvaluator for HttpProficiencyEvaluator {
    async fn evaluate(&self, request: &EvaluationRequest) -> Result<Assessment, EvaluatorError> {
        let body = serde_json::json!({
            "messages": request.messages,
            "current_level": request.current_level.as_str(),
            "target_language": request.target_language,
            "native_language": request.native_language,
            "localize_insights": request.localize_insights,
        });

        let response = self
            .client
            .post(format!("{}/evaluate-proficiency", self.base_url))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(EvaluatorError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let raw: RawResponse = serde_json::from_str(&body).map_err(|e| {
            tracing::error!(payload = %body, error = %e, "Undecodable evaluation response");
            EvaluatorError::Malformed(e.to_string())
        })?;

        if !raw.success {
            return Err(EvaluatorError::Rejected(raw.error.unwrap_or_else(|| {
                raw.status.unwrap_or_else(|| "no error detail".to_string())
            })));
        }

        let data = raw.data.ok_or_else(|| {
            tracing::error!(payload = %body, "Success response without assessment data");
            EvaluatorError::Malformed("success response missing data".to_string())
        })?;

        parse_assessment(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(json: serde_json::Value) -> RawAssessment {
        serde_json::from_value(json).expect("raw assessment should deserialize")
    }

    // -----------------------------------------------------------------------
    // Valid payloads
    // -----------------------------------------------------------------------

    #[test]
    fn full_assessment_parses() {
        let assessment = parse_assessment(raw(serde_json::json!({
            "suggested_level": "B2",
            "confidence": 0.85,
            "grammar_patterns": [
                {"pattern": "past tense overuse", "description": null, "examples": ["fui", "hice"]}
            ],
            "vocabulary_assessment": [
                {"strength": "travel vocabulary", "examples": ["equipaje"]}
            ],
            "reasoning": "Consistent compound sentences.",
            "proficiency_message": "You're ready for B2 material."
        })))
        .unwrap();

        assert_eq!(assessment.suggestion(), Some((CefrLevel::B2, 0.85)));
        assert_eq!(assessment.grammar_patterns.len(), 1);
        assert_eq!(assessment.vocabulary_assessment.len(), 1);
        assert_eq!(
            assessment.proficiency_message.as_deref(),
            Some("You're ready for B2 material.")
        );
    }

    #[test]
    fn missing_finding_lists_default_to_empty() {
        let assessment = parse_assessment(raw(serde_json::json!({
            "suggested_level": "A2",
            "confidence": 0.4
        })))
        .unwrap();

        assert!(assessment.grammar_patterns.is_empty());
        assert!(assessment.vocabulary_assessment.is_empty());
        assert_eq!(assessment.suggestion(), Some((CefrLevel::A2, 0.4)));
    }

    #[test]
    fn empty_payload_is_a_valid_no_opinion_assessment() {
        let assessment = parse_assessment(raw(serde_json::json!({}))).unwrap();
        assert_eq!(assessment.suggestion(), None);
        assert!(assessment.grammar_patterns.is_empty());
    }

    #[test]
    fn confidence_without_suggestion_is_allowed() {
        let assessment = parse_assessment(raw(serde_json::json!({"confidence": 0.9}))).unwrap();
        assert_eq!(assessment.suggestion(), None);
    }

    // -----------------------------------------------------------------------
    // Malformed payloads
    // -----------------------------------------------------------------------

    #[test]
    fn suggestion_without_confidence_is_malformed() {
        let err = parse_assessment(raw(serde_json::json!({"suggested_level": "B1"}))).unwrap_err();
        assert!(matches!(err, EvaluatorError::Malformed(_)));
    }

    #[test]
    fn out_of_range_confidence_is_malformed() {
        for confidence in [-0.1, 1.5] {
            let err = parse_assessment(raw(serde_json::json!({
                "suggested_level": "B1",
                "confidence": confidence
            })))
            .unwrap_err();
            assert!(matches!(err, EvaluatorError::Malformed(_)));
        }
    }

    // -----------------------------------------------------------------------
    // Unknown level codes fail closed
    // -----------------------------------------------------------------------

    #[test]
    fn unknown_level_code_degrades_to_no_suggestion() {
        let assessment = parse_assessment(raw(serde_json::json!({
            "suggested_level": "Z9",
            "confidence": 0.95,
            "grammar_patterns": [{"pattern": "articles"}]
        })))
        .unwrap();

        assert_eq!(assessment.suggestion(), None);
        assert_eq!(assessment.confidence, None);
        // The rest of the assessment is still usable.
        assert_eq!(assessment.grammar_patterns.len(), 1);
    }
}
