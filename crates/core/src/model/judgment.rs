use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::model::progress::Bucket;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfidenceError {
    #[error("confidence must be between 1 and 5, got {0}")]
    OutOfRange(u8),
}

//
// ─── CONFIDENCE ────────────────────────────────────────────────────────────────
//

/// Self-assessed confidence submitted alongside each answer, 1 (guessing)
/// through 5 (certain). The scoring service folds it into bucket assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Confidence(u8);

impl Confidence {
    /// Lowest confidence; skips are judged at this level.
    pub const MIN: Confidence = Confidence(1);
    pub const MAX: Confidence = Confidence(5);

    /// Validates a raw 1-5 rating.
    ///
    /// # Errors
    ///
    /// Returns `ConfidenceError::OutOfRange` if the value is not in 1..=5.
    pub fn new(value: u8) -> Result<Self, ConfidenceError> {
        if (1..=5).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ConfidenceError::OutOfRange(value))
        }
    }

    /// Returns the underlying 1-5 rating.
    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for Confidence {
    /// Middle of the scale, the pre-selected value in the original UI.
    fn default() -> Self {
        Confidence(3)
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

//
// ─── JUDGMENT ──────────────────────────────────────────────────────────────────
//

/// A successful verdict from the scoring service for one submitted answer.
///
/// `correct_text` is the expected answer in the target language, echoed back
/// so it can be shown even when the student was wrong. `bucket` is the
/// mastery category the service moved the word into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Judgment {
    pub correct: bool,
    pub correct_text: String,
    pub bucket: Bucket,
}

impl Judgment {
    #[must_use]
    pub fn new(correct: bool, correct_text: impl Into<String>, bucket: Bucket) -> Self {
        Self {
            correct,
            correct_text: correct_text.into(),
            bucket,
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confidence_accepts_full_scale() {
        for v in 1..=5 {
            assert_eq!(Confidence::new(v).unwrap().value(), v);
        }
    }

    #[test]
    fn confidence_rejects_out_of_range() {
        assert!(matches!(
            Confidence::new(0).unwrap_err(),
            ConfidenceError::OutOfRange(0)
        ));
        assert!(matches!(
            Confidence::new(6).unwrap_err(),
            ConfidenceError::OutOfRange(6)
        ));
    }

    #[test]
    fn skip_level_is_the_minimum() {
        assert_eq!(Confidence::MIN.value(), 1);
        assert_eq!(Confidence::default().value(), 3);
    }

    #[test]
    fn judgment_keeps_the_expected_answer() {
        let j = Judgment::new(false, "kat", Bucket::Review);
        assert!(!j.correct);
        assert_eq!(j.correct_text, "kat");
        assert_eq!(j.bucket, Bucket::Review);
    }
}
