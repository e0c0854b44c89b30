#![forbid(unsafe_code)]

pub mod controller;
pub mod error;
pub mod quiz_session;
pub mod scoring;
pub mod scoring_client;

pub use trainer_core::Clock;

pub use controller::{FEEDBACK_PACING, Presented, REFILL_PACING, SessionController};
pub use error::{ScoringError, SessionError};
pub use quiz_session::{Feedback, FeedbackKind, PromptView, QuizSession, SessionProgress};
pub use scoring::{AnswerRequest, ScoreboardRow, ScoringService, Verdict};
pub use scoring_client::{HttpScoringClient, ScoringConfig};
