use async_trait::async_trait;
use quiz_core::model::BestScore;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Repository contract for the persisted best score.
#[async_trait]
pub trait BestScoreRepository: Send + Sync {
    /// Fetch the stored best score, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read or holds invalid data.
    async fn get_best(&self) -> Result<Option<BestScore>, StorageError>;

    /// Replace the stored best score.
    ///
    /// Callers decide whether the score is an improvement; the repository stores
    /// whatever it is given.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the score cannot be stored.
    async fn save_best(&self, score: &BestScore) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    best: Arc<Mutex<Option<BestScore>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the repository with an existing best score.
    #[must_use]
    pub fn with_best(score: BestScore) -> Self {
        Self {
            best: Arc::new(Mutex::new(Some(score))),
        }
    }
}

#[async_trait]
impl BestScoreRepository for InMemoryRepository {
    async fn get_best(&self) -> Result<Option<BestScore>, StorageError> {
        let guard = self
            .best
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(*guard)
    }

    async fn save_best(&self, score: &BestScore) -> Result<(), StorageError> {
        let mut guard = self
            .best
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = Some(*score);
        Ok(())
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub best_scores: Arc<dyn BestScoreRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let best_scores: Arc<dyn BestScoreRepository> = Arc::new(InMemoryRepository::new());
        Self { best_scores }
    }
}
