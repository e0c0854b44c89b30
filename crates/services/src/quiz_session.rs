use chrono::{DateTime, Utc};
use std::fmt;

use trainer_core::hint_from;
use trainer_core::model::{Direction, Judgment, VocabItem};

//
// ─── FEEDBACK ──────────────────────────────────────────────────────────────────
//

/// How the feedback for the last action came about. Skips reuse the same
/// judging call as answers but keep their own kind so the display can say so.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackKind {
    Answered,
    Skipped,
    Rejected,
}

/// Feedback text shown after an answer, a skip, or a service rejection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub kind: FeedbackKind,
    pub message: String,
}

impl Feedback {
    #[must_use]
    pub fn answered(judgment: &Judgment) -> Self {
        let verdict = if judgment.correct {
            "Correct"
        } else {
            "Incorrect"
        };
        Self {
            kind: FeedbackKind::Answered,
            message: format!(
                "{verdict}. Expected: {}. New bucket: {}",
                judgment.correct_text, judgment.bucket
            ),
        }
    }

    #[must_use]
    pub fn skipped(judgment: &Judgment) -> Self {
        Self {
            kind: FeedbackKind::Skipped,
            message: format!(
                "Skipped. Marked {}. Expected: {}",
                judgment.bucket, judgment.correct_text
            ),
        }
    }

    #[must_use]
    pub fn rejected(reason: &str) -> Self {
        Self {
            kind: FeedbackKind::Rejected,
            message: format!("Error: {reason}"),
        }
    }
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

//
// ─── VIEWS ─────────────────────────────────────────────────────────────────────
//

/// Read-only view of the current question, ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptView {
    /// Prompt text in the session's source language.
    pub text: String,
    /// 1-based question number within the current batch.
    pub position: usize,
    pub total: usize,
}

/// Aggregated position within the current batch, useful for UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionProgress {
    pub answered: usize,
    pub total: usize,
    pub exhausted: bool,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// In-memory state of one quiz run: the current batch, the cursor into it,
/// and the answer direction.
///
/// Invariant: `cursor <= items.len()`; the session is exhausted exactly when
/// they are equal. The cursor only ever moves forward by one (per judged
/// answer or skip) and only resets when a fresh batch replaces the items.
/// All transitions are synchronous; the pacing delays around them belong to
/// the embedding adapter.
///
/// Every mutating operation takes `&mut self`, so overlapping submissions
/// cannot be started while one is in flight.
pub struct QuizSession {
    direction: Direction,
    items: Vec<VocabItem>,
    cursor: usize,
    feedback: Option<Feedback>,
    started_at: DateTime<Utc>,
}

impl QuizSession {
    /// Create an empty (exhausted) session; the first `present` refills it.
    #[must_use]
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            items: Vec::new(),
            cursor: 0,
            feedback: None,
            started_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn feedback(&self) -> Option<&Feedback> {
        self.feedback.as_ref()
    }

    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.items.len()
    }

    #[must_use]
    pub fn current_item(&self) -> Option<&VocabItem> {
        self.items.get(self.cursor)
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        SessionProgress {
            answered: self.cursor,
            total: self.items.len(),
            exhausted: self.is_exhausted(),
        }
    }

    /// Swap in a freshly fetched batch and restart from its first item.
    pub fn replace_batch(&mut self, items: Vec<VocabItem>) {
        self.items = items;
        self.cursor = 0;
        self.feedback = None;
    }

    /// Expose the current prompt, clearing any stale feedback.
    ///
    /// Never advances the cursor; returns `None` when exhausted.
    pub fn prompt(&mut self) -> Option<PromptView> {
        let total = self.items.len();
        let position = self.cursor + 1;
        let item = self.items.get(self.cursor)?;
        let view = PromptView {
            text: self.direction.prompt_of(item).to_string(),
            position,
            total,
        };
        self.feedback = None;
        Some(view)
    }

    /// Record a successful judgment and advance to the next question.
    ///
    /// Skips and answers share this transition; `kind` keeps them apart in
    /// the feedback. Returns the stored feedback. Does nothing when the
    /// session is exhausted.
    pub fn record_judged(&mut self, kind: FeedbackKind, judgment: &Judgment) -> Option<&Feedback> {
        if self.is_exhausted() {
            return None;
        }
        let feedback = match kind {
            FeedbackKind::Skipped => Feedback::skipped(judgment),
            _ => Feedback::answered(judgment),
        };
        self.feedback = Some(feedback);
        self.cursor += 1;
        self.feedback.as_ref()
    }

    /// Record a service-reported rejection. The cursor stays put so the
    /// question remains retryable.
    pub fn record_rejection(&mut self, reason: &str) -> &Feedback {
        self.feedback.insert(Feedback::rejected(reason))
    }

    /// First letter of the answer-side text's first word, or `None` when the
    /// session is exhausted. Pure; touches neither server nor mirror.
    #[must_use]
    pub fn hint(&self) -> Option<char> {
        let item = self.current_item()?;
        hint_from(self.direction.expected_of(item))
    }

    /// Discard the batch and leave the question view. Idempotent.
    pub fn stop(&mut self) {
        self.items.clear();
        self.cursor = 0;
        self.feedback = None;
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("direction", &self.direction)
            .field("items_len", &self.items.len())
            .field("cursor", &self.cursor)
            .field("started_at", &self.started_at)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use trainer_core::model::{Bucket, WordId};

    fn items(n: u64) -> Vec<VocabItem> {
        (1..=n)
            .map(|i| VocabItem::new(WordId::new(i), format!("fr{i}"), format!("nl{i}")))
            .collect()
    }

    fn judgment() -> Judgment {
        Judgment::new(true, "nl1", Bucket::Mastered)
    }

    #[test]
    fn new_session_is_exhausted() {
        let session = QuizSession::new(Direction::Fr2Nl);
        assert!(session.is_exhausted());
        assert!(session.current_item().is_none());
    }

    #[test]
    fn replace_batch_resets_cursor_and_feedback() {
        let mut session = QuizSession::new(Direction::Fr2Nl);
        session.replace_batch(items(3));
        session.record_judged(FeedbackKind::Answered, &judgment());
        assert_eq!(session.progress().answered, 1);

        session.replace_batch(items(2));
        assert_eq!(session.progress().answered, 0);
        assert_eq!(session.progress().total, 2);
        assert!(session.feedback().is_none());
    }

    #[test]
    fn prompt_shows_position_without_advancing() {
        let mut session = QuizSession::new(Direction::Fr2Nl);
        session.replace_batch(items(3));

        let first = session.prompt().unwrap();
        assert_eq!(first.text, "fr1");
        assert_eq!((first.position, first.total), (1, 3));

        // Presenting twice shows the same question.
        let again = session.prompt().unwrap();
        assert_eq!(again, first);
    }

    #[test]
    fn prompt_follows_direction() {
        let mut session = QuizSession::new(Direction::Nl2Fr);
        session.replace_batch(items(1));
        assert_eq!(session.prompt().unwrap().text, "nl1");
    }

    #[test]
    fn prompt_clears_stale_feedback() {
        let mut session = QuizSession::new(Direction::Fr2Nl);
        session.replace_batch(items(2));
        session.record_judged(FeedbackKind::Answered, &judgment());
        assert!(session.feedback().is_some());

        session.prompt().unwrap();
        assert!(session.feedback().is_none());
    }

    #[test]
    fn cursor_is_monotone_and_bounded() {
        let mut session = QuizSession::new(Direction::Fr2Nl);
        session.replace_batch(items(3));

        let mut last = 0;
        for _ in 0..10 {
            session.record_judged(FeedbackKind::Answered, &judgment());
            let answered = session.progress().answered;
            assert!(answered >= last);
            assert!(answered <= session.progress().total);
            last = answered;
        }
        assert!(session.is_exhausted());
        assert_eq!(session.progress().answered, 3);
    }

    #[test]
    fn rejection_keeps_the_question_retryable() {
        let mut session = QuizSession::new(Direction::Fr2Nl);
        session.replace_batch(items(2));

        let feedback = session.record_rejection("unknown id").clone();
        assert_eq!(feedback.kind, FeedbackKind::Rejected);
        assert_eq!(feedback.message, "Error: unknown id");
        assert_eq!(session.progress().answered, 0);
        assert_eq!(session.current_item().unwrap().id, WordId::new(1));
    }

    #[test]
    fn skipped_feedback_is_distinct_from_answered() {
        let mut session = QuizSession::new(Direction::Fr2Nl);
        session.replace_batch(items(2));

        let fb = session
            .record_judged(FeedbackKind::Skipped, &judgment())
            .unwrap()
            .clone();
        assert_eq!(fb.kind, FeedbackKind::Skipped);
        assert!(fb.message.starts_with("Skipped."));
        assert_eq!(session.progress().answered, 1);
    }

    #[test]
    fn hint_takes_first_letter_of_first_answer_token() {
        let mut session = QuizSession::new(Direction::Fr2Nl);
        session.replace_batch(vec![VocabItem::new(WordId::new(1), "chien", "hond zwart")]);
        assert_eq!(session.hint(), Some('h'));

        let mut reversed = QuizSession::new(Direction::Nl2Fr);
        reversed.replace_batch(vec![VocabItem::new(WordId::new(1), "chien", "hond zwart")]);
        assert_eq!(reversed.hint(), Some('c'));
    }

    #[test]
    fn hint_on_exhausted_session_is_none() {
        let session = QuizSession::new(Direction::Fr2Nl);
        assert_eq!(session.hint(), None);
    }

    #[test]
    fn stop_discards_items_and_is_idempotent() {
        let mut session = QuizSession::new(Direction::Fr2Nl);
        session.replace_batch(items(3));
        session.stop();
        session.stop();

        assert!(session.is_exhausted());
        assert_eq!(session.progress().total, 0);
        assert!(session.feedback().is_none());
    }
}
