use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{Question, QuestionId, QuestionRuntimeState};

/// Percentage at or above which a result counts as a pass.
pub const PASS_PERCENTAGE: u8 = 60;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ScoreError {
    #[error("cannot score a test without questions")]
    NoQuestions,

    #[error("correct count ({correct}) exceeds total ({total})")]
    CountMismatch { correct: u32, total: u32 },

    #[error("too many questions to score: {len}")]
    TooManyQuestions { len: usize },
}

//
// ─── SCORE SUMMARY ────────────────────────────────────────────────────────────
//

/// Frozen result of a submitted test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSummary {
    correct: u32,
    total: u32,
    percentage: u8,
}

impl ScoreSummary {
    /// Build a summary from raw counts; the percentage is rounded half up.
    ///
    /// # Errors
    ///
    /// Returns `ScoreError::NoQuestions` when `total` is zero.
    /// Returns `ScoreError::CountMismatch` when `correct > total`.
    pub fn from_counts(correct: u32, total: u32) -> Result<Self, ScoreError> {
        if total == 0 {
            return Err(ScoreError::NoQuestions);
        }
        if correct > total {
            return Err(ScoreError::CountMismatch { correct, total });
        }

        let numerator = 200 * u64::from(correct) + u64::from(total);
        let denominator = 2 * u64::from(total);
        // correct <= total keeps this within 0..=100.
        let percentage = u8::try_from(numerator / denominator).unwrap_or(100);

        Ok(Self {
            correct,
            total,
            percentage,
        })
    }

    #[must_use]
    pub fn correct(&self) -> u32 {
        self.correct
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    #[must_use]
    pub fn percentage(&self) -> u8 {
        self.percentage
    }

    #[must_use]
    pub fn passed(&self) -> bool {
        self.percentage >= PASS_PERCENTAGE
    }

    #[must_use]
    pub fn grade(&self) -> Grade {
        Grade::from_percentage(self.percentage)
    }
}

//
// ─── GRADE ────────────────────────────────────────────────────────────────────
//

/// Coarse band for a percentage score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grade {
    Excellent,
    VeryGood,
    Good,
    NeedsImprovement,
}

impl Grade {
    #[must_use]
    pub fn from_percentage(percentage: u8) -> Self {
        match percentage {
            90.. => Grade::Excellent,
            75..=89 => Grade::VeryGood,
            60..=74 => Grade::Good,
            _ => Grade::NeedsImprovement,
        }
    }
}

//
// ─── SCORER ───────────────────────────────────────────────────────────────────
//

/// Count exact matches between selections and correct options.
///
/// Review flags are ignored; only the selected option matters. Questions
/// without a runtime state count as unanswered.
///
/// # Errors
///
/// Returns `ScoreError::NoQuestions` for an empty question set.
pub fn score(
    questions: &[Question],
    states: &[QuestionRuntimeState],
) -> Result<ScoreSummary, ScoreError> {
    let selections: HashMap<&QuestionId, Option<&str>> = states
        .iter()
        .map(|state| (state.question_id(), state.selected()))
        .collect();

    let correct = questions
        .iter()
        .filter(|question| {
            let selected = selections.get(question.id()).copied().flatten();
            question.is_correct(selected)
        })
        .count();

    let total = u32::try_from(questions.len()).map_err(|_| ScoreError::TooManyQuestions {
        len: questions.len(),
    })?;
    let correct = u32::try_from(correct).map_err(|_| ScoreError::TooManyQuestions {
        len: questions.len(),
    })?;

    ScoreSummary::from_counts(correct, total)
}
