//! Integration tests for the target-language filter.
//!
//! Exercises [`parlo_analysis::filter::retain_target_language`] against an
//! in-memory [`LanguageDetector`] fake: no network, no database, no
//! mocking framework.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{Duration, Utc};

use parlo_analysis::detector::{DetectorError, LanguageDetection, LanguageDetector};
use parlo_analysis::evaluator::SampledMessage;
use parlo_analysis::filter::retain_target_language;

/// Scripted detector: classifies by exact content lookup.
///
/// * mapped to `true`  - confirmed target language
/// * mapped to `false` - some other language
/// * unmapped          - simulated transient failure
struct FakeDetector {
    verdicts: HashMap<String, bool>,
}

impl FakeDetector {
    fn new(verdicts: &[(&str, bool)]) -> Self {
        Self {
            verdicts: verdicts
                .iter()
                .map(|(content, verdict)| (content.to_string(), *verdict))
                .collect(),
        }
    }
}

#[async_trait]
impl LanguageDetector for FakeDetector {
    async fn detect(
        &self,
        text: &str,
        target_language: &str,
    ) -> Result<LanguageDetection, DetectorError> {
        match self.verdicts.get(text) {
            Some(&is_target) => Ok(LanguageDetection {
                is_target_language: is_target,
                detected_language: if is_target {
                    target_language.to_string()
                } else {
                    "English".to_string()
                },
            }),
            None => Err(DetectorError::Malformed("scripted failure".to_string())),
        }
    }
}

/// Build a chronological sample where message `i` was sent `i` minutes
/// after the first.
fn sample(contents: &[&str]) -> Vec<SampledMessage> {
    let start = Utc::now();
    contents
        .iter()
        .enumerate()
        .map(|(i, content)| SampledMessage {
            content: content.to_string(),
            timestamp: start + Duration::minutes(i as i64),
        })
        .collect()
}

fn contents(messages: &[SampledMessage]) -> Vec<&str> {
    messages.iter().map(|m| m.content.as_str()).collect()
}

// ---------------------------------------------------------------------------
// Retention
// ---------------------------------------------------------------------------

#[tokio::test]
async fn keeps_only_confirmed_target_language_messages() {
    // Three learner messages, exactly one in the target language: the
    // evaluator sample must contain exactly that one.
    let detector = FakeDetector::new(&[
        ("hola, ¿cómo estás?", true),
        ("wait, what does that mean?", false),
        ("can you say that in English?", false),
    ]);

    let retained = retain_target_language(
        sample(&[
            "hola, ¿cómo estás?",
            "wait, what does that mean?",
            "can you say that in English?",
        ]),
        &detector,
        "Spanish",
    )
    .await;

    assert_eq!(contents(&retained), vec!["hola, ¿cómo estás?"]);
}

#[tokio::test]
async fn preserves_chronological_order() {
    let detector = FakeDetector::new(&[
        ("primero", true),
        ("second one, in English", false),
        ("tercero", true),
        ("cuarto", true),
    ]);

    let retained = retain_target_language(
        sample(&["primero", "second one, in English", "tercero", "cuarto"]),
        &detector,
        "Spanish",
    )
    .await;

    assert_eq!(contents(&retained), vec!["primero", "tercero", "cuarto"]);
    assert!(retained[0].timestamp < retained[1].timestamp);
    assert!(retained[1].timestamp < retained[2].timestamp);
}

#[tokio::test]
async fn empty_sample_is_a_valid_result() {
    let detector = FakeDetector::new(&[]);
    let retained = retain_target_language(Vec::new(), &detector, "Spanish").await;
    assert!(retained.is_empty());
}

#[tokio::test]
async fn all_messages_rejected_yields_empty_sample() {
    let detector = FakeDetector::new(&[("hello", false), ("how are you", false)]);

    let retained =
        retain_target_language(sample(&["hello", "how are you"]), &detector, "Spanish").await;

    assert!(retained.is_empty());
}

// ---------------------------------------------------------------------------
// Failure degradation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn detector_failure_excludes_only_that_message() {
    // "se cayó el detector" is unmapped, so the fake errors on it. The
    // failure must not take the rest of the batch down with it.
    let detector = FakeDetector::new(&[("uno", true), ("dos", true)]);

    let retained = retain_target_language(
        sample(&["uno", "se cayó el detector", "dos"]),
        &detector,
        "Spanish",
    )
    .await;

    assert_eq!(contents(&retained), vec!["uno", "dos"]);
}

#[tokio::test]
async fn every_detection_failing_yields_empty_sample() {
    let detector = FakeDetector::new(&[]);

    let retained = retain_target_language(sample(&["uno", "dos"]), &detector, "Spanish").await;

    assert!(retained.is_empty());
}
