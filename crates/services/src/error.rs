//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::BestScoreError;
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

use crate::sessions::SessionState;

/// Errors emitted by `AnswerTracker`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TrackerError {
    #[error("question {position} does not exist (session has {len} questions)")]
    PositionOutOfRange { position: usize, len: usize },
    #[error("option {option} does not exist for question {position} ({len} options)")]
    OptionOutOfRange {
        position: usize,
        option: usize,
        len: usize,
    },
}

/// Errors emitted by `BestScoreService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BestScoreServiceError {
    #[error(transparent)]
    Score(#[from] BestScoreError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by session services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("session is {0}, answers can only be recorded while in progress")]
    NotInProgress(SessionState),
    #[error(transparent)]
    Tracker(#[from] TrackerError),
    #[error(transparent)]
    BestScore(#[from] BestScoreServiceError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
}
