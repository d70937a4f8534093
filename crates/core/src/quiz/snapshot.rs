use chrono::{DateTime, Utc};
use std::fmt;

use crate::model::{QuestionId, QuestionStatus, SessionId};
use crate::scoring::ScoreSummary;

/// Coarse lifecycle position of a quiz session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuizPhase {
    /// Questions are loaded but the countdown has not started.
    Ready,
    InProgress,
    /// Terminal: the score is frozen.
    Submitted,
}

impl fmt::Display for QuizPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            QuizPhase::Ready => "not started",
            QuizPhase::InProgress => "in progress",
            QuizPhase::Submitted => "submitted",
        };
        f.write_str(label)
    }
}

/// Read-only view of one question. Never carries the correct answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionSnapshot {
    pub id: QuestionId,
    pub prompt: String,
    pub options: Vec<String>,
    pub status: QuestionStatus,
    pub selected: Option<String>,
    pub visited: bool,
}

/// Point-in-time copy of a quiz session, handed to presentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSnapshot {
    pub session_id: SessionId,
    pub phase: QuizPhase,
    pub current_index: usize,
    pub time_left_secs: u32,
    pub duration_secs: u32,
    pub questions: Vec<QuestionSnapshot>,
    pub score: Option<ScoreSummary>,
    pub auto_submitted: bool,
    pub started_at: Option<DateTime<Utc>>,
    pub submitted_at: Option<DateTime<Utc>>,
}

/// Per-status tally of a snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub not_attempted: usize,
    pub answered: usize,
    pub not_answered: usize,
    pub review: usize,
}

impl QuizSnapshot {
    #[must_use]
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&QuestionSnapshot> {
        self.questions.get(self.current_index)
    }

    #[must_use]
    pub fn is_submitted(&self) -> bool {
        self.phase == QuizPhase::Submitted
    }

    #[must_use]
    pub fn status_counts(&self) -> StatusCounts {
        self.questions
            .iter()
            .fold(StatusCounts::default(), |mut counts, question| {
                match question.status {
                    QuestionStatus::NotAttempted => counts.not_attempted += 1,
                    QuestionStatus::Answered => counts.answered += 1,
                    QuestionStatus::NotAnswered => counts.not_answered += 1,
                    QuestionStatus::Review => counts.review += 1,
                }
                counts
            })
    }
}
