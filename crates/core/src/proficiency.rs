//! CEFR proficiency levels and the automated level-transition rules.
//!
//! This module lives in `core` (zero internal deps) so the repository
//! layer, the analysis pipeline, and any future CLI tooling share a single
//! ordering. Levels are a proper enum compared by rank; unknown level
//! strings parse to `None` and never enter a comparison.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Policy constants
// ---------------------------------------------------------------------------

/// Minimum evaluator confidence required before an automated suggestion
/// may advance an already-assessed learner. Inclusive bound. Fixed policy,
/// not user-configurable.
pub const AUTO_UPDATE_CONFIDENCE_THRESHOLD: f64 = 0.7;

/// Grading-context level handed to the evaluator for learners that have
/// never been assessed. Never written back to the learner record.
pub const BASELINE_LEVEL: CefrLevel = CefrLevel::B1;

// ---------------------------------------------------------------------------
// CefrLevel
// ---------------------------------------------------------------------------

/// The six CEFR proficiency levels.
///
/// Variant order defines the total order A1 < A2 < B1 < B2 < C1 < C2 via
/// the derived `Ord`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CefrLevel {
    A1,
    A2,
    B1,
    B2,
    C1,
    C2,
}

impl CefrLevel {
    /// Canonical uppercase code as stored in the database.
    pub fn as_str(self) -> &'static str {
        match self {
            CefrLevel::A1 => "A1",
            CefrLevel::A2 => "A2",
            CefrLevel::B1 => "B1",
            CefrLevel::B2 => "B2",
            CefrLevel::C1 => "C1",
            CefrLevel::C2 => "C2",
        }
    }

    /// Parse a level code, tolerating surrounding whitespace and any case.
    ///
    /// Returns `None` for anything that is not one of the six CEFR codes.
    /// Callers must treat `None` as "no level", never as a comparable value.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A1" => Some(CefrLevel::A1),
            "A2" => Some(CefrLevel::A2),
            "B1" => Some(CefrLevel::B1),
            "B2" => Some(CefrLevel::B2),
            "C1" => Some(CefrLevel::C1),
            "C2" => Some(CefrLevel::C2),
            _ => None,
        }
    }
}

impl std::fmt::Display for CefrLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Transition rules
// ---------------------------------------------------------------------------

/// Outcome of applying an evaluator suggestion to a learner's stored level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelTransition {
    /// The level after the transition. Equal to the input level when no
    /// rule fired; `None` only when the learner had no level and the
    /// evaluator offered no suggestion.
    pub new_level: Option<CefrLevel>,
    /// The learner had no level and received the suggestion as-is.
    pub was_initial_assignment: bool,
    /// An existing level was advanced by the confidence-gated rule.
    pub was_auto_updated: bool,
}

impl LevelTransition {
    /// `true` when the stored level differs from the pre-transition value.
    pub fn level_changed(&self) -> bool {
        self.was_initial_assignment || self.was_auto_updated
    }
}

/// Apply the automated transition rules to a learner's level.
///
/// * Initial assignment: a learner with no level takes the suggestion
///   unconditionally — neither the confidence gate nor `auto_update`
///   applies to the first assessment.
/// * Auto-update: an assessed learner advances only when `auto_update` is
///   enabled, `confidence >= 0.7` (inclusive), and the suggestion is
///   strictly higher than the current level.
/// * Every other case leaves the level unchanged. Suggestions at or below
///   the current level never regress it: regression is a deliberate user
///   or administrator action, not an automated one.
///
/// `suggestion` pairs the suggested level with its confidence; the
/// evaluator contract guarantees the pairing, so an unpaired confidence
/// cannot reach this function.
pub fn maybe_advance(
    current: Option<CefrLevel>,
    auto_update: bool,
    suggestion: Option<(CefrLevel, f64)>,
) -> LevelTransition {
    match (current, suggestion) {
        (None, Some((suggested, _confidence))) => LevelTransition {
            new_level: Some(suggested),
            was_initial_assignment: true,
            was_auto_updated: false,
        },
        (Some(level), Some((suggested, confidence)))
            if auto_update
                && confidence >= AUTO_UPDATE_CONFIDENCE_THRESHOLD
                && suggested > level =>
        {
            LevelTransition {
                new_level: Some(suggested),
                was_initial_assignment: false,
                was_auto_updated: true,
            }
        }
        _ => LevelTransition {
            new_level: current,
            was_initial_assignment: false,
            was_auto_updated: false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -----------------------------------------------------------------------
    // Ordering and parsing
    // -----------------------------------------------------------------------

    #[test]
    fn levels_are_totally_ordered() {
        assert!(CefrLevel::A1 < CefrLevel::A2);
        assert!(CefrLevel::A2 < CefrLevel::B1);
        assert!(CefrLevel::B1 < CefrLevel::B2);
        assert!(CefrLevel::B2 < CefrLevel::C1);
        assert!(CefrLevel::C1 < CefrLevel::C2);
    }

    #[test]
    fn parse_accepts_all_six_codes() {
        for (code, level) in [
            ("A1", CefrLevel::A1),
            ("A2", CefrLevel::A2),
            ("B1", CefrLevel::B1),
            ("B2", CefrLevel::B2),
            ("C1", CefrLevel::C1),
            ("C2", CefrLevel::C2),
        ] {
            assert_eq!(CefrLevel::parse(code), Some(level));
        }
    }

    #[test]
    fn parse_is_case_insensitive_and_trims() {
        assert_eq!(CefrLevel::parse("b2"), Some(CefrLevel::B2));
        assert_eq!(CefrLevel::parse("  C1 "), Some(CefrLevel::C1));
    }

    #[test]
    fn parse_fails_closed_on_unknown_codes() {
        assert_eq!(CefrLevel::parse("D1"), None);
        assert_eq!(CefrLevel::parse("B3"), None);
        assert_eq!(CefrLevel::parse("intermediate"), None);
        assert_eq!(CefrLevel::parse(""), None);
    }

    #[test]
    fn display_round_trips_through_parse() {
        let level = CefrLevel::B2;
        assert_eq!(CefrLevel::parse(&level.to_string()), Some(level));
    }

    // -----------------------------------------------------------------------
    // Initial assignment
    // -----------------------------------------------------------------------

    #[test]
    fn initial_assignment_bypasses_confidence_gate() {
        let t = maybe_advance(None, true, Some((CefrLevel::B1, 0.1)));
        assert_eq!(t.new_level, Some(CefrLevel::B1));
        assert!(t.was_initial_assignment);
        assert!(!t.was_auto_updated);
    }

    #[test]
    fn initial_assignment_ignores_auto_update_flag() {
        let t = maybe_advance(None, false, Some((CefrLevel::A2, 0.5)));
        assert_eq!(t.new_level, Some(CefrLevel::A2));
        assert!(t.was_initial_assignment);
    }

    #[test]
    fn no_level_and_no_suggestion_stays_unset() {
        let t = maybe_advance(None, true, None);
        assert_eq!(t.new_level, None);
        assert!(!t.level_changed());
    }

    // -----------------------------------------------------------------------
    // Confidence gate boundary
    // -----------------------------------------------------------------------

    #[test]
    fn confidence_exactly_at_threshold_advances() {
        let t = maybe_advance(Some(CefrLevel::A1), true, Some((CefrLevel::A2, 0.7)));
        assert_eq!(t.new_level, Some(CefrLevel::A2));
        assert!(t.was_auto_updated);
    }

    #[test]
    fn confidence_just_below_threshold_does_not_advance() {
        let t = maybe_advance(Some(CefrLevel::A1), true, Some((CefrLevel::A2, 0.69)));
        assert_eq!(t.new_level, Some(CefrLevel::A1));
        assert!(!t.level_changed());
    }

    // -----------------------------------------------------------------------
    // Monotonicity
    // -----------------------------------------------------------------------

    #[test]
    fn equal_suggestion_is_a_no_op() {
        let t = maybe_advance(Some(CefrLevel::B1), true, Some((CefrLevel::B1, 0.99)));
        assert_eq!(t.new_level, Some(CefrLevel::B1));
        assert!(!t.level_changed());
    }

    #[test]
    fn lower_suggestion_never_downgrades() {
        let t = maybe_advance(Some(CefrLevel::C1), true, Some((CefrLevel::B1, 0.95)));
        assert_eq!(t.new_level, Some(CefrLevel::C1));
        assert!(!t.level_changed());
    }

    #[test]
    fn upgrade_then_lower_suggestion_keeps_the_higher_level() {
        let first = maybe_advance(Some(CefrLevel::B2), true, Some((CefrLevel::C1, 0.95)));
        assert_eq!(first.new_level, Some(CefrLevel::C1));

        let second = maybe_advance(first.new_level, true, Some((CefrLevel::B1, 0.95)));
        assert_eq!(second.new_level, Some(CefrLevel::C1));
        assert!(!second.level_changed());
    }

    #[test]
    fn level_is_non_decreasing_over_any_response_sequence() {
        let suggestions = [
            Some((CefrLevel::A2, 0.9)),
            Some((CefrLevel::A1, 0.99)),
            None,
            Some((CefrLevel::B2, 0.7)),
            Some((CefrLevel::B1, 0.95)),
            Some((CefrLevel::B2, 0.3)),
            Some((CefrLevel::C2, 0.69)),
        ];

        let mut current = Some(CefrLevel::A1);
        for suggestion in suggestions {
            let before = current;
            current = maybe_advance(current, true, suggestion).new_level;
            assert!(current >= before, "level regressed: {before:?} -> {current:?}");
        }
        assert_eq!(current, Some(CefrLevel::B2));
    }

    // -----------------------------------------------------------------------
    // Auto-update disabled
    // -----------------------------------------------------------------------

    #[test]
    fn disabled_auto_update_never_advances() {
        let t = maybe_advance(Some(CefrLevel::A1), false, Some((CefrLevel::C2, 1.0)));
        assert_eq!(t.new_level, Some(CefrLevel::A1));
        assert!(!t.level_changed());
    }

    #[test]
    fn no_suggestion_leaves_existing_level_alone() {
        let t = maybe_advance(Some(CefrLevel::B2), true, None);
        assert_eq!(t.new_level, Some(CefrLevel::B2));
        assert!(!t.level_changed());
    }
}
