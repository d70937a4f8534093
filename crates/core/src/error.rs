use thiserror::Error;

use crate::model::{QuestionError, QuestionId};
use crate::quiz::QuizPhase;
use crate::scoring::ScoreError;

/// Errors returned by `QuizSession`. A failed operation never changes state.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("a test needs at least one question")]
    NoQuestions,

    #[error("question id {0} appears more than once")]
    DuplicateQuestion(QuestionId),

    #[error(transparent)]
    InvalidQuestion(#[from] QuestionError),

    #[error("{operation} is not allowed while the test is {phase}")]
    InvalidState {
        operation: &'static str,
        phase: QuizPhase,
    },

    #[error("question index {index} is out of range (0..{len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("unknown question id {0}")]
    UnknownQuestion(QuestionId),

    #[error("{option:?} is not an option of question {id}")]
    InvalidOption { id: QuestionId, option: String },

    #[error("option index {index} is out of range (0..{count})")]
    OptionOutOfRange { index: usize, count: usize },

    #[error(transparent)]
    Score(#[from] ScoreError),
}
