use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use trainer_core::model::{Confidence, Direction, Judgment, VocabItem, WordId};

use crate::error::ScoringError;

//
// ─── ANSWER SUBMISSION ─────────────────────────────────────────────────────────
//

/// Payload sent to the scoring service for one answer (or skip).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerRequest {
    pub id: WordId,
    pub answer: String,
    pub confidence: Confidence,
    pub direction: Direction,
}

impl AnswerRequest {
    #[must_use]
    pub fn new(
        id: WordId,
        answer: impl Into<String>,
        confidence: Confidence,
        direction: Direction,
    ) -> Self {
        Self {
            id,
            answer: answer.into(),
            confidence,
            direction,
        }
    }
}

/// Outcome of a judging call that reached the service.
///
/// `Rejected` carries a service-reported semantic error (for example an
/// unknown word id). It is terminal for that submission but leaves the
/// question retryable; transport failures never take this path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Judged(Judgment),
    Rejected(String),
}

//
// ─── SCOREBOARD ────────────────────────────────────────────────────────────────
//

/// One row of the service's authoritative progress view.
///
/// Aggregate counts, unlike the local mirror's last-seen snapshot. The
/// bucket is kept as the raw wire string so server-side categories the
/// client does not know about still display.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ScoreboardRow {
    pub fr: String,
    pub nl: String,
    pub bucket: String,
    pub correct_count: u32,
    pub total_tests: u32,
}

//
// ─── SERVICE CONTRACT ──────────────────────────────────────────────────────────
//

/// The remote vocabulary scoring service.
///
/// Batch selection, answer judging, bucket transitions, and persistence all
/// live behind this seam; the client only consumes its HTTP contract. The
/// trait exists so the session controller can be exercised against a mock.
#[async_trait]
pub trait ScoringService: Send + Sync {
    /// Initialize the service's vocabulary database (idempotent server-side).
    ///
    /// # Errors
    ///
    /// Returns `ScoringError` on transport or protocol failures.
    async fn init(&self) -> Result<(), ScoringError>;

    /// Fetch the initial diagnostic batch. The service picks the size; the
    /// quiz direction is client-held and not sent.
    ///
    /// # Errors
    ///
    /// Returns `ScoringError` on transport or protocol failures.
    async fn diagnostic_batch(&self) -> Result<Vec<VocabItem>, ScoringError>;

    /// Fetch an adaptively selected batch of up to `n` items.
    ///
    /// # Errors
    ///
    /// Returns `ScoringError` on transport or protocol failures.
    async fn adaptive_batch(&self, n: usize) -> Result<Vec<VocabItem>, ScoringError>;

    /// Submit an answer for judging.
    ///
    /// # Errors
    ///
    /// Returns `ScoringError` on transport or protocol failures; a
    /// service-reported semantic error is `Ok(Verdict::Rejected)`.
    async fn judge(&self, request: AnswerRequest) -> Result<Verdict, ScoringError>;

    /// Fetch the service's aggregate progress rows.
    ///
    /// # Errors
    ///
    /// Returns `ScoringError` on transport or protocol failures.
    async fn scoreboard(&self) -> Result<Vec<ScoreboardRow>, ScoringError>;

    /// Download the CSV export as raw text.
    ///
    /// # Errors
    ///
    /// Returns `ScoringError` on transport or protocol failures.
    async fn export_csv(&self) -> Result<String, ScoringError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answer_request_serializes_to_the_wire_shape() {
        let request = AnswerRequest::new(
            WordId::new(7),
            "kat",
            Confidence::new(4).unwrap(),
            Direction::Fr2Nl,
        );
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 7,
                "answer": "kat",
                "confidence": 4,
                "direction": "fr2nl"
            })
        );
    }

    #[test]
    fn scoreboard_row_deserializes_with_extra_fields() {
        let json = r#"{
            "id": 3,
            "fr": "chien",
            "nl": "hond",
            "bucket": "Fuzzy",
            "correct_count": 2,
            "total_tests": 5,
            "next_review": null
        }"#;
        let row: ScoreboardRow = serde_json::from_str(json).unwrap();
        assert_eq!(row.bucket, "Fuzzy");
        assert_eq!(row.correct_count, 2);
        assert_eq!(row.total_tests, 5);
    }
}
