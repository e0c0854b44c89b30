use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BucketError {
    #[error("unknown bucket: {0}")]
    Unknown(String),
}

//
// ─── BUCKET ────────────────────────────────────────────────────────────────────
//

/// Coarse mastery category assigned to a word by the scoring service.
///
/// The client never computes bucket transitions; it only displays the value
/// the service reports after each judged answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Bucket {
    /// Answered correctly with high confidence; long review interval.
    Mastered,
    /// Partially known; medium review interval.
    Learning,
    /// Missed recently; due for frequent review.
    Review,
}

impl Bucket {
    /// Wire string as it appears in service responses.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Bucket::Mastered => "Mastered",
            Bucket::Learning => "Learning",
            Bucket::Review => "Review",
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Bucket {
    type Err = BucketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Mastered" => Ok(Bucket::Mastered),
            "Learning" => Ok(Bucket::Learning),
            "Review" => Ok(Bucket::Review),
            other => Err(BucketError::Unknown(other.to_string())),
        }
    }
}

//
// ─── PROGRESS RECORD ───────────────────────────────────────────────────────────
//

/// Last-seen snapshot of one word in the local progress mirror.
///
/// Keyed by the source-language (prompted) word. Later writes overwrite
/// earlier ones wholesale; there is no merging. The mirror is a display
/// cache — the scoring service's aggregate progress stays authoritative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressRecord {
    pub source_word: String,
    pub target_word: String,
    pub bucket: Bucket,
    pub last_correct: bool,
    pub updated_at: DateTime<Utc>,
}

impl ProgressRecord {
    #[must_use]
    pub fn new(
        source_word: impl Into<String>,
        target_word: impl Into<String>,
        bucket: Bucket,
        last_correct: bool,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            source_word: source_word.into(),
            target_word: target_word.into(),
            bucket,
            last_correct,
            updated_at,
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
