//! Message sender and category vocabulary.
//!
//! Both enums map to TEXT columns on the `messages` table. Parsing fails
//! closed: a row with an unrecognized value is simply not eligible for
//! analysis.

/// Who authored a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SenderRole {
    /// The end user practicing the target language.
    Learner,
    /// The AI tutor.
    Assistant,
    /// Synthetic messages (greetings, notices) injected by the platform.
    System,
}

impl SenderRole {
    /// Database representation.
    pub fn as_str(self) -> &'static str {
        match self {
            SenderRole::Learner => "learner",
            SenderRole::Assistant => "assistant",
            SenderRole::System => "system",
        }
    }

    /// Parse the database representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "learner" => Some(SenderRole::Learner),
            "assistant" => Some(SenderRole::Assistant),
            "system" => Some(SenderRole::System),
            _ => None,
        }
    }
}

/// What kind of content a message carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageCategory {
    /// An ordinary conversational message.
    Ordinary,
    /// A correction annotation attached to a learner mistake. Excluded
    /// from proficiency analysis: it is tutor output, not learner output.
    Correction,
}

impl MessageCategory {
    /// Database representation.
    pub fn as_str(self) -> &'static str {
        match self {
            MessageCategory::Ordinary => "ordinary",
            MessageCategory::Correction => "correction",
        }
    }

    /// Parse the database representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ordinary" => Some(MessageCategory::Ordinary),
            "correction" => Some(MessageCategory::Correction),
            _ => None,
        }
    }
}
