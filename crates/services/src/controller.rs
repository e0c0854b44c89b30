use std::sync::Arc;
use std::time::Duration;

use trainer_core::model::{Confidence, Direction, ProgressRecord};
use trainer_core::time::Clock;

use storage::mirror::ProgressMirror;

use crate::error::SessionError;
use crate::quiz_session::{Feedback, FeedbackKind, PromptView, QuizSession};
use crate::scoring::{AnswerRequest, ScoreboardRow, ScoringService, Verdict};

/// Pause shown after a refill so the "fetching a new set" state is
/// perceptible. Cosmetic; the adapter schedules it between transitions.
pub const REFILL_PACING: Duration = Duration::from_secs(1);

/// Pause after a judged answer or skip, so the feedback can be read before
/// the next prompt replaces it. Cosmetic.
pub const FEEDBACK_PACING: Duration = Duration::from_secs(4);

const DEFAULT_REFILL_SIZE: usize = 10;
const DEFAULT_MAX_REFILL_ATTEMPTS: u32 = 3;

/// A presented question, plus whether presenting it required a refill (so
/// the adapter knows to schedule `REFILL_PACING`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presented {
    pub prompt: PromptView,
    pub refilled: bool,
}

/// Orchestrates the quiz session against the scoring service and the local
/// progress mirror.
///
/// The controller owns the collaborators; the `QuizSession` it drives is
/// passed in by exclusive reference, so no two state-changing operations can
/// overlap. Transport failures from the service propagate unretried.
#[derive(Clone)]
pub struct SessionController {
    clock: Clock,
    scoring: Arc<dyn ScoringService>,
    mirror: Arc<dyn ProgressMirror>,
    refill_size: usize,
    max_refill_attempts: u32,
}

impl SessionController {
    #[must_use]
    pub fn new(
        clock: Clock,
        scoring: Arc<dyn ScoringService>,
        mirror: Arc<dyn ProgressMirror>,
    ) -> Self {
        Self {
            clock,
            scoring,
            mirror,
            refill_size: DEFAULT_REFILL_SIZE,
            max_refill_attempts: DEFAULT_MAX_REFILL_ATTEMPTS,
        }
    }

    /// Batch size used for refills and as the `start_adaptive` default.
    #[must_use]
    pub fn with_refill_size(mut self, refill_size: usize) -> Self {
        self.refill_size = refill_size;
        self
    }

    /// Cap on consecutive empty refill batches before giving up.
    #[must_use]
    pub fn with_max_refill_attempts(mut self, attempts: u32) -> Self {
        self.max_refill_attempts = attempts;
        self
    }

    /// Ask the service to (re)initialize its vocabulary database.
    ///
    /// # Errors
    ///
    /// Propagates scoring transport failures.
    pub async fn initialize(&self) -> Result<(), SessionError> {
        self.scoring.init().await?;
        Ok(())
    }

    /// Start a session from the initial diagnostic batch.
    ///
    /// # Errors
    ///
    /// Propagates scoring transport failures; the caller decides whether to
    /// retry the whole start.
    pub async fn start_diagnostic(
        &self,
        direction: Direction,
    ) -> Result<QuizSession, SessionError> {
        let items = self.scoring.diagnostic_batch().await?;
        let mut session = QuizSession::new(direction);
        session.replace_batch(items);
        Ok(session)
    }

    /// Start a session from an adaptively selected batch of `batch_size`
    /// items (or the controller default when `None`).
    ///
    /// # Errors
    ///
    /// Propagates scoring transport failures.
    pub async fn start_adaptive(
        &self,
        direction: Direction,
        batch_size: Option<usize>,
    ) -> Result<QuizSession, SessionError> {
        let n = batch_size.unwrap_or(self.refill_size);
        let items = self.scoring.adaptive_batch(n).await?;
        let mut session = QuizSession::new(direction);
        session.replace_batch(items);
        Ok(session)
    }

    /// Present the current question, refilling the batch first when the
    /// session is exhausted.
    ///
    /// A successful non-empty refill resets the cursor to 0 and yields the
    /// first new prompt. Empty batches do not loop forever: after
    /// `max_refill_attempts` of them the exhausted state is surfaced as
    /// `SessionError::OutOfItems`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::OutOfItems` when the service keeps returning
    /// empty batches; propagates scoring transport failures.
    pub async fn present_current(
        &self,
        session: &mut QuizSession,
    ) -> Result<Presented, SessionError> {
        let mut attempts = 0;
        while session.is_exhausted() {
            if attempts >= self.max_refill_attempts {
                return Err(SessionError::OutOfItems { attempts });
            }
            attempts += 1;
            let items = self.scoring.adaptive_batch(self.refill_size).await?;
            if items.is_empty() {
                log::warn!("adaptive refill returned no items (attempt {attempts})");
                continue;
            }
            log::debug!("refilled session with {} items", items.len());
            session.replace_batch(items);
        }

        let Some(prompt) = session.prompt() else {
            return Err(SessionError::Exhausted);
        };
        Ok(Presented {
            prompt,
            refilled: attempts > 0,
        })
    }

    /// Submit the student's answer for the current question.
    ///
    /// On a judged verdict the progress mirror is updated (keyed by the
    /// source-language word), feedback is recorded, and the cursor advances
    /// by one — atomically, before any pacing delay. On a service-reported
    /// rejection only feedback changes; the question stays retryable.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Exhausted` when there is no current question
    /// (callers treat this as a no-op); propagates transport failures.
    pub async fn submit_answer(
        &self,
        session: &mut QuizSession,
        raw_answer: &str,
        confidence: Confidence,
    ) -> Result<Feedback, SessionError> {
        self.judge_current(session, raw_answer, confidence, FeedbackKind::Answered)
            .await
    }

    /// Give up on the current question. Judged like an empty answer at the
    /// lowest confidence, but reported as a skip; advances and writes
    /// progress exactly like a submitted answer.
    ///
    /// # Errors
    ///
    /// Same as [`Self::submit_answer`].
    pub async fn skip(&self, session: &mut QuizSession) -> Result<Feedback, SessionError> {
        self.judge_current(session, "", Confidence::MIN, FeedbackKind::Skipped)
            .await
    }

    async fn judge_current(
        &self,
        session: &mut QuizSession,
        raw_answer: &str,
        confidence: Confidence,
        kind: FeedbackKind,
    ) -> Result<Feedback, SessionError> {
        let Some(item) = session.current_item().cloned() else {
            return Err(SessionError::Exhausted);
        };
        let direction = session.direction();

        let request = AnswerRequest::new(item.id, raw_answer, confidence, direction);
        let verdict = self.scoring.judge(request).await?;

        match verdict {
            Verdict::Rejected(reason) => Ok(session.record_rejection(&reason).clone()),
            Verdict::Judged(judgment) => {
                let record = ProgressRecord::new(
                    direction.source_of(&item),
                    direction.target_of(&item),
                    judgment.bucket,
                    judgment.correct,
                    self.clock.now(),
                );
                // A dead mirror degrades the display, not the session.
                if let Err(err) = self.mirror.upsert(&record).await {
                    log::warn!("progress mirror write failed, continuing without it: {err}");
                }

                let feedback = session
                    .record_judged(kind, &judgment)
                    .ok_or(SessionError::Exhausted)?;
                Ok(feedback.clone())
            }
        }
    }

    /// Hint for the current question, if any. Read-only.
    #[must_use]
    pub fn request_hint(&self, session: &QuizSession) -> Option<char> {
        session.hint()
    }

    /// The local mirror's last-seen snapshot, one record per source word.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Mirror` if the mirror cannot be read.
    pub async fn local_snapshot(&self) -> Result<Vec<ProgressRecord>, SessionError> {
        Ok(self.mirror.snapshot().await?)
    }

    /// Clear the local mirror. The server's progress is untouched.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Mirror` if the mirror cannot be cleared.
    pub async fn local_reset(&self) -> Result<(), SessionError> {
        Ok(self.mirror.clear().await?)
    }

    /// The service's authoritative aggregate progress rows.
    ///
    /// # Errors
    ///
    /// Propagates scoring transport failures.
    pub async fn scoreboard(&self) -> Result<Vec<ScoreboardRow>, SessionError> {
        Ok(self.scoring.scoreboard().await?)
    }

    /// Raw CSV export from the service.
    ///
    /// # Errors
    ///
    /// Propagates scoring transport failures.
    pub async fn export_csv(&self) -> Result<String, SessionError> {
        Ok(self.scoring.export_csv().await?)
    }
}
