use quiz_core::{Grade, QuizSnapshot, ScoreSummary};

use crate::vm::time_fmt::format_datetime;

#[must_use]
pub fn grade_label(grade: Grade) -> &'static str {
    match grade {
        Grade::Excellent => "EXCELLENT",
        Grade::VeryGood => "VERY GOOD",
        Grade::Good => "GOOD",
        Grade::NeedsImprovement => "NEEDS IMPROVEMENT",
    }
}

/// Completed-screen content for a submitted test.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SummaryVm {
    pub percentage: u8,
    pub grade: &'static str,
    pub correct_line: String,
    pub passed: bool,
    pub auto_submitted: bool,
    pub submitted_at_str: Option<String>,
}

impl SummaryVm {
    #[must_use]
    pub fn new(score: ScoreSummary, auto_submitted: bool) -> Self {
        Self {
            percentage: score.percentage(),
            grade: grade_label(score.grade()),
            correct_line: format!(
                "{} out of {} questions correct",
                score.correct(),
                score.total()
            ),
            passed: score.passed(),
            auto_submitted,
            submitted_at_str: None,
        }
    }

    /// `None` until the snapshot carries a frozen score.
    #[must_use]
    pub fn from_snapshot(snapshot: &QuizSnapshot) -> Option<Self> {
        let score = snapshot.score?;
        Some(Self {
            submitted_at_str: snapshot.submitted_at.map(format_datetime),
            ..Self::new(score, snapshot.auto_submitted)
        })
    }
}
