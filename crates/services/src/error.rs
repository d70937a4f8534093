//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::QuizError;
use quiz_core::model::QuestionError;

/// Errors emitted while loading the question bank.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoadError {
    #[error("question bank did not answer in time")]
    Timeout,
    #[error("question bank request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error("question bank request failed: {0}")]
    Http(#[source] reqwest::Error),
    #[error("question bank returned no questions")]
    Empty,
    #[error(transparent)]
    InvalidQuestion(#[from] QuestionError),
    #[error(transparent)]
    Rejected(#[from] QuizError),
}

impl From<reqwest::Error> for LoadError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Http(err)
        }
    }
}

/// Errors emitted while delivering a final report.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ReportError {
    #[error("result collector answered with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted by `QuizController`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ControllerError {
    #[error("questions have not been loaded")]
    NotLoaded,
    #[error("questions are already loaded")]
    AlreadyLoaded,
    #[error("questions are still loading")]
    LoadInProgress,
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Quiz(#[from] QuizError),
}
