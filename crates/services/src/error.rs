//! Shared error types for the services crate.

use thiserror::Error;

use storage::mirror::MirrorError;

/// Errors emitted by the scoring service client.
///
/// These are transport-level or protocol-level failures. A semantic
/// rejection of a single answer is not an error here; it is reported as
/// `Verdict::Rejected` so the session can surface it as feedback.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ScoringError {
    #[error("scoring service request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("malformed scoring response: {0}")]
    MalformedResponse(String),
}

/// Errors emitted by the quiz session controller.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("session has no current question")]
    Exhausted,
    #[error("scoring service returned no items after {attempts} refill attempts")]
    OutOfItems { attempts: u32 },
    #[error(transparent)]
    Scoring(#[from] ScoringError),
    #[error(transparent)]
    Mirror(#[from] MirrorError),
}
