use thiserror::Error;

use crate::model::{BankError, BestScoreError, QuestionError, SettingsError, TagError};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Bank(#[from] BankError),
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Tag(#[from] TagError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    BestScore(#[from] BestScoreError),
}
