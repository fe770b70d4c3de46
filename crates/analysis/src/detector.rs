//! Language detection client.
//!
//! The detector answers one question: is this text written in the
//! session's target language? It is a pure classification oracle. Any
//! failure is local to the message being classified and never aborts a
//! batch (the filter degrades a failed detection to "excluded").

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

/// Default request timeout for a single detection call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

// ---------------------------------------------------------------------------
// Contract
// ---------------------------------------------------------------------------

/// Result of classifying one text against a target language.
#[derive(Debug, Clone, Deserialize)]
pub struct LanguageDetection {
    /// Whether the text is written in the requested target language.
    pub is_target_language: bool,
    /// Name of the language the detector actually identified.
    pub detected_language: String,
}

/// Errors from the detection layer.
#[derive(Debug, thiserror::Error)]
pub enum DetectorError {
    /// The HTTP request itself failed (network, DNS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The detection service returned a non-2xx status code.
    #[error("Detection service error ({status}): {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The response body could not be decoded.
    #[error("Malformed detection response: {0}")]
    Malformed(String),
}

/// Classifies whether a text is written in a given language.
#[async_trait]
pub trait LanguageDetector: Send + Sync {
    /// Classify `text` against `target_language` (a language name, e.g.
    /// `"Spanish"`).
    async fn detect(
        &self,
        text: &str,
        target_language: &str,
    ) -> Result<LanguageDetection, DetectorError>;
}

// ---------------------------------------------------------------------------
// HTTP implementation
// ---------------------------------------------------------------------------

/// HTTP client for the analysis service's `/detect-language` endpoint.
pub struct HttpLanguageDetector {
    client: reqwest::Client,
    base_url: String,
}

impl HttpLanguageDetector {
    /// Create a detector client with an explicit per-request timeout.
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
impl LanguageDetector for HttpLanguageDetector {
    async fn detect(
        &self,
        text: &str,
        target_language: &str,
    ) -> Result<LanguageDetection, DetectorError> {
        // Empty input is classifiable without a network call: it is not
        // the target language (or any language).
        if text.trim().is_empty() {
            return Ok(LanguageDetection {
                is_target_language: false,
                detected_language: "unknown".to_string(),
            });
        }

        let body = serde_json::json!({
            "text": text,
            "target_language": target_language,
        });

        let response = self
            .client
            .post(format!("{}/detect-language", self.base_url))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(DetectorError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(payload = %body, error = %e, "Undecodable detection response");
            DetectorError::Malformed(e.to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // The whitespace short-circuit must not touch the network, so it is
    // testable against an unroutable base URL.

    #[tokio::test]
    async fn empty_text_is_not_target_language() {
        let detector = HttpLanguageDetector::new("http://127.0.0.1:1".into(), DEFAULT_TIMEOUT);
        let result = detector.detect("", "Spanish").await.unwrap();
        assert!(!result.is_target_language);
    }

    #[tokio::test]
    async fn whitespace_only_text_is_not_target_language() {
        let detector = HttpLanguageDetector::new("http://127.0.0.1:1".into(), DEFAULT_TIMEOUT);
        let result = detector.detect("  \n\t ", "Spanish").await.unwrap();
        assert!(!result.is_target_language);
        assert_eq!(result.detected_language, "unknown");
    }
}
