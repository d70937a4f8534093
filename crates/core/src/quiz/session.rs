use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::error::QuizError;
use crate::model::{Question, QuestionId, QuestionRuntimeState, SessionId};
use crate::scoring::{self, ScoreSummary};
use crate::time::Clock;

use super::report::{FinalReport, ReportedQuestion};
use super::snapshot::{QuestionSnapshot, QuizPhase, QuizSnapshot};

/// Default countdown length: one hour.
pub const DEFAULT_DURATION_SECS: u32 = 60 * 60;

//
// ─── OUTCOMES ─────────────────────────────────────────────────────────────────
//

/// Result of a submit request.
///
/// Only the first submission carries a report, so a session can be reported
/// at most once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Submitted {
        summary: ScoreSummary,
        report: FinalReport,
    },
    AlreadySubmitted {
        summary: ScoreSummary,
    },
}

impl SubmitOutcome {
    #[must_use]
    pub fn summary(&self) -> ScoreSummary {
        match self {
            SubmitOutcome::Submitted { summary, .. }
            | SubmitOutcome::AlreadySubmitted { summary } => *summary,
        }
    }
}

/// Result of one countdown tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    Running {
        time_left_secs: u32,
    },
    /// The countdown hit zero and the session submitted itself.
    Expired {
        summary: ScoreSummary,
        report: FinalReport,
    },
}

#[derive(Debug, Clone, Copy)]
struct Submission {
    submitted_at: DateTime<Utc>,
    summary: ScoreSummary,
    automatic: bool,
}

//
// ─── SESSION ──────────────────────────────────────────────────────────────────
//

/// In-memory state machine for one timed test.
///
/// Owns the question set, per-question runtime state, the visited set, the
/// cursor and the countdown. Every operation either applies fully or returns
/// an error without touching state.
pub struct QuizSession {
    id: SessionId,
    clock: Clock,
    questions: Vec<Question>,
    index_of: HashMap<QuestionId, usize>,
    states: Vec<QuestionRuntimeState>,
    visited: HashSet<QuestionId>,
    current: usize,
    duration_secs: u32,
    time_left_secs: u32,
    started_at: Option<DateTime<Utc>>,
    submission: Option<Submission>,
}

impl QuizSession {
    /// Create a session over a loaded question set.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NoQuestions` for an empty set and
    /// `QuizError::DuplicateQuestion` if two questions share an id.
    pub fn new(questions: Vec<Question>, duration_secs: u32, clock: Clock) -> Result<Self, QuizError> {
        if questions.is_empty() {
            return Err(QuizError::NoQuestions);
        }

        let mut index_of = HashMap::with_capacity(questions.len());
        for (index, question) in questions.iter().enumerate() {
            if index_of.insert(question.id().clone(), index).is_some() {
                return Err(QuizError::DuplicateQuestion(question.id().clone()));
            }
        }

        let states = questions
            .iter()
            .map(|question| QuestionRuntimeState::new(question.id().clone()))
            .collect();

        Ok(Self {
            id: SessionId::new(),
            clock,
            questions,
            index_of,
            states,
            visited: HashSet::new(),
            current: 0,
            duration_secs,
            time_left_secs: duration_secs,
            started_at: None,
            submission: None,
        })
    }

    #[must_use]
    pub fn with_session_id(mut self, id: SessionId) -> Self {
        self.id = id;
        self
    }

    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    #[must_use]
    pub fn phase(&self) -> QuizPhase {
        if self.submission.is_some() {
            QuizPhase::Submitted
        } else if self.started_at.is_some() {
            QuizPhase::InProgress
        } else {
            QuizPhase::Ready
        }
    }

    #[must_use]
    pub fn is_started(&self) -> bool {
        self.started_at.is_some()
    }

    #[must_use]
    pub fn is_submitted(&self) -> bool {
        self.submission.is_some()
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn time_left_secs(&self) -> u32 {
        self.time_left_secs
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn states(&self) -> &[QuestionRuntimeState] {
        &self.states
    }

    #[must_use]
    pub fn state_of(&self, id: &QuestionId) -> Option<&QuestionRuntimeState> {
        self.index_of.get(id).map(|&index| &self.states[index])
    }

    #[must_use]
    pub fn is_visited(&self, id: &QuestionId) -> bool {
        self.visited.contains(id)
    }

    /// Frozen score, available once submitted.
    #[must_use]
    pub fn score(&self) -> Option<ScoreSummary> {
        self.submission.map(|submission| submission.summary)
    }

    // ─── Operations ───────────────────────────────────────────────────────────

    /// Start the countdown. Calling it again while running is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidState` once the session is submitted.
    pub fn start(&mut self) -> Result<(), QuizError> {
        match self.phase() {
            QuizPhase::Ready => {
                self.started_at = Some(self.clock.now());
                self.time_left_secs = self.duration_secs;
                Ok(())
            }
            QuizPhase::InProgress => Ok(()),
            phase @ QuizPhase::Submitted => Err(QuizError::InvalidState {
                operation: "start",
                phase,
            }),
        }
    }

    /// Select `option` for question `id`, marking it answered.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidState` unless the session is in progress,
    /// `QuizError::UnknownQuestion` for an id outside the set, and
    /// `QuizError::InvalidOption` when the question does not offer `option`.
    pub fn select_answer(&mut self, id: &QuestionId, option: &str) -> Result<(), QuizError> {
        self.ensure_in_progress("select_answer")?;
        let index = *self
            .index_of
            .get(id)
            .ok_or_else(|| QuizError::UnknownQuestion(id.clone()))?;
        if !self.questions[index].has_option(option) {
            return Err(QuizError::InvalidOption {
                id: id.clone(),
                option: option.to_owned(),
            });
        }

        self.states[index].select(option.to_owned());
        Ok(())
    }

    /// Select the option at `index` of the current question.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidState` unless the session is in progress and
    /// `QuizError::OptionOutOfRange` if the question has no such option.
    pub fn select_option(&mut self, index: usize) -> Result<(), QuizError> {
        self.ensure_in_progress("select_option")?;
        let current = self.current;
        let options = self.questions[current].options();
        let Some(option) = options.get(index) else {
            return Err(QuizError::OptionOutOfRange {
                index,
                count: options.len(),
            });
        };

        self.states[current].select(option.clone());
        Ok(())
    }

    /// Leave the current question and move to the next one, if any.
    ///
    /// An untouched question becomes `NotAnswered`; answered and flagged
    /// questions keep their status.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidState` unless the session is in progress.
    pub fn advance(&mut self) -> Result<(), QuizError> {
        self.ensure_in_progress("advance")?;
        let index = self.current;
        self.visited.insert(self.questions[index].id().clone());
        self.states[index].mark_skipped();
        if index + 1 < self.questions.len() {
            self.current = index + 1;
        }
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `QuizError::InvalidState` unless the session is in progress.
    pub fn retreat(&mut self) -> Result<(), QuizError> {
        self.ensure_in_progress("retreat")?;
        self.current = self.current.saturating_sub(1);
        Ok(())
    }

    /// Flag the current question for review, keeping any selection.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidState` unless the session is in progress.
    pub fn mark_for_review(&mut self) -> Result<(), QuizError> {
        self.ensure_in_progress("mark_for_review")?;
        self.states[self.current].mark_for_review();
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `QuizError::InvalidState` unless the session is in progress and
    /// `QuizError::IndexOutOfRange` if `index` is not a question position.
    pub fn jump_to(&mut self, index: usize) -> Result<(), QuizError> {
        self.ensure_in_progress("jump_to")?;
        let Some(question) = self.questions.get(index) else {
            return Err(QuizError::IndexOutOfRange {
                index,
                len: self.questions.len(),
            });
        };

        self.visited.insert(question.id().clone());
        self.current = index;
        Ok(())
    }

    /// Freeze the score and end the session.
    ///
    /// The first call returns the report to deliver; later calls return the
    /// same summary and nothing to report.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidState` if the session was never started.
    pub fn submit(&mut self) -> Result<SubmitOutcome, QuizError> {
        if let Some(submission) = self.submission {
            return Ok(SubmitOutcome::AlreadySubmitted {
                summary: submission.summary,
            });
        }
        self.ensure_in_progress("submit")?;

        let (summary, report) = self.seal(false)?;
        Ok(SubmitOutcome::Submitted { summary, report })
    }

    /// Count the countdown down by one second, submitting at zero.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidState` unless the session is in progress.
    pub fn tick(&mut self) -> Result<TickOutcome, QuizError> {
        self.ensure_in_progress("tick")?;

        let time_left_secs = self.time_left_secs.saturating_sub(1);
        if time_left_secs > 0 {
            self.time_left_secs = time_left_secs;
            return Ok(TickOutcome::Running { time_left_secs });
        }

        let (summary, report) = self.seal(true)?;
        Ok(TickOutcome::Expired { summary, report })
    }

    // ─── Views ────────────────────────────────────────────────────────────────

    #[must_use]
    pub fn snapshot(&self) -> QuizSnapshot {
        let questions = self
            .questions
            .iter()
            .zip(&self.states)
            .map(|(question, state)| QuestionSnapshot {
                id: question.id().clone(),
                prompt: question.prompt().to_owned(),
                options: question.options().to_vec(),
                status: state.status(),
                selected: state.selected().map(str::to_owned),
                visited: self.visited.contains(question.id()),
            })
            .collect();

        QuizSnapshot {
            session_id: self.id,
            phase: self.phase(),
            current_index: self.current,
            time_left_secs: self.time_left_secs,
            duration_secs: self.duration_secs,
            questions,
            score: self.score(),
            auto_submitted: self.submission.is_some_and(|s| s.automatic),
            started_at: self.started_at,
            submitted_at: self.submission.map(|s| s.submitted_at),
        }
    }

    // ─── Internals ────────────────────────────────────────────────────────────

    fn ensure_in_progress(&self, operation: &'static str) -> Result<(), QuizError> {
        match self.phase() {
            QuizPhase::InProgress => Ok(()),
            phase => Err(QuizError::InvalidState { operation, phase }),
        }
    }

    /// Score first, then commit, so a scoring failure leaves the session open.
    fn seal(&mut self, automatic: bool) -> Result<(ScoreSummary, FinalReport), QuizError> {
        let summary = scoring::score(&self.questions, &self.states)?;
        let submitted_at = self.clock.now();

        if automatic {
            self.time_left_secs = 0;
        }
        self.submission = Some(Submission {
            submitted_at,
            summary,
            automatic,
        });

        Ok((summary, self.final_report(summary, submitted_at, automatic)))
    }

    fn final_report(
        &self,
        summary: ScoreSummary,
        submitted_at: DateTime<Utc>,
        automatic: bool,
    ) -> FinalReport {
        let questions = self
            .questions
            .iter()
            .zip(&self.states)
            .map(|(question, state)| ReportedQuestion {
                id: question.id().clone(),
                question: question.prompt().to_owned(),
                options: question.options().to_vec(),
                correct_answer: question.correct_answer().to_owned(),
                status: state.status(),
                selected_answer: state.selected().map(str::to_owned),
            })
            .collect();

        FinalReport {
            session_id: self.id,
            auto_submitted: automatic,
            started_at: self.started_at,
            submitted_at,
            score: summary,
            questions,
        }
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("id", &self.id)
            .field("questions_len", &self.questions.len())
            .field("current", &self.current)
            .field("visited_len", &self.visited.len())
            .field("time_left_secs", &self.time_left_secs)
            .field("phase", &self.phase())
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ────────────────────────────────────────────────────────────────────
//
