use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::QuestionId;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

/// Reasons a question record cannot become a `Question`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question {id} has a blank prompt")]
    BlankPrompt { id: QuestionId },

    #[error("question {id} has no options")]
    NoOptions { id: QuestionId },

    #[error("question {id} names {answer:?} as correct but does not offer it")]
    CorrectAnswerNotAnOption { id: QuestionId, answer: String },
}

//
// ─── WIRE RECORD ──────────────────────────────────────────────────────────────
//

/// Question exactly as the question bank serves it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRecord {
    pub id: QuestionId,
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: String,
}

//
// ─── QUESTION ─────────────────────────────────────────────────────────────────
//

/// A validated, immutable multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    prompt: String,
    options: Vec<String>,
    correct_answer: String,
}

impl Question {
    /// Build a question, checking that it is answerable.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::BlankPrompt` if the prompt is empty or whitespace.
    /// Returns `QuestionError::NoOptions` if no options are offered.
    /// Returns `QuestionError::CorrectAnswerNotAnOption` if the correct answer
    /// is not one of the options.
    pub fn new(
        id: QuestionId,
        prompt: impl Into<String>,
        options: Vec<String>,
        correct_answer: impl Into<String>,
    ) -> Result<Self, QuestionError> {
        let prompt = prompt.into();
        let correct_answer = correct_answer.into();

        if prompt.trim().is_empty() {
            return Err(QuestionError::BlankPrompt { id });
        }
        if options.is_empty() {
            return Err(QuestionError::NoOptions { id });
        }
        if !options.iter().any(|option| *option == correct_answer) {
            return Err(QuestionError::CorrectAnswerNotAnOption {
                id,
                answer: correct_answer,
            });
        }

        Ok(Self {
            id,
            prompt,
            options,
            correct_answer,
        })
    }

    #[must_use]
    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn correct_answer(&self) -> &str {
        &self.correct_answer
    }

    #[must_use]
    pub fn has_option(&self, option: &str) -> bool {
        self.options.iter().any(|candidate| candidate == option)
    }

    /// Exact, case-sensitive comparison against the correct option.
    #[must_use]
    pub fn is_correct(&self, selected: Option<&str>) -> bool {
        selected == Some(self.correct_answer.as_str())
    }
}

impl TryFrom<QuestionRecord> for Question {
    type Error = QuestionError;

    fn try_from(record: QuestionRecord) -> Result<Self, Self::Error> {
        Question::new(
            record.id,
            record.question,
            record.options,
            record.correct_answer,
        )
    }
}

impl From<&Question> for QuestionRecord {
    fn from(question: &Question) -> Self {
        Self {
            id: question.id.clone(),
            question: question.prompt.clone(),
            options: question.options.clone(),
            correct_answer: question.correct_answer.clone(),
        }
    }
}

//
// ─── TESTS ────────────────────────────────────────────────────────────────────
//
