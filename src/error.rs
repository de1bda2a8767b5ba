use thiserror::Error;

use crate::quiz::question::Difficulty;

/// Everything here is recoverable: callers log it and fold it into state.
#[derive(Debug, Error)]
pub enum QuizError {
    #[error("question provider unavailable: {0}")]
    ProviderUnavailable(String),
    #[error("no {0} questions are available right now, please try again")]
    NoContentAvailable(Difficulty),
    #[error("leaderboard storage unavailable: {0}")]
    PersistenceUnavailable(String),
    #[error("invalid navigation: {0}")]
    InvalidNavigation(&'static str),
    #[error("cannot {action} while session is {state}")]
    InvalidTransition {
        state: &'static str,
        action: &'static str,
    },
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("stored leaderboard is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
    #[error("storage is not available")]
    Unavailable,
}

impl From<StoreError> for QuizError {
    fn from(err: StoreError) -> Self {
        QuizError::PersistenceUnavailable(err.to_string())
    }
}
