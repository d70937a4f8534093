//! Plain-text rendering of quiz screens for terminal front ends.

use std::fmt::Write as _;

use quiz_core::quiz::StatusCounts;

use crate::vm::{LEGEND, PaletteTileVm, QuestionVm, ScreenVm, SummaryVm, WelcomeVm};

#[must_use]
pub fn render_screen(screen: &ScreenVm) -> String {
    match screen {
        ScreenVm::Loading { notice } => format!("Loading questions...\n{notice}\n"),
        ScreenVm::LoadError { message } => format!(
            "Could not load the test: {message}\nType `retry` to try again or `quit` to leave.\n"
        ),
        ScreenVm::Welcome(welcome) => render_welcome(welcome),
        ScreenVm::Question(question) => render_question(question),
        ScreenVm::Completed(summary) => render_summary(summary),
    }
}

fn render_welcome(welcome: &WelcomeVm) -> String {
    format!(
        "Welcome to the mock test\n{}\nType `start` to begin.\n",
        welcome.message()
    )
}

fn render_question(question: &QuestionVm) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Question {} of {}    Time left {}",
        question.number, question.total, question.time_left
    );
    let _ = writeln!(out, "\n{}\n", question.prompt);
    for option in &question.options {
        let mark = if option.selected { 'x' } else { ' ' };
        let _ = writeln!(out, "  [{mark}] {}) {}", option.number, option.label);
    }
    let _ = writeln!(out, "\n{}", render_palette(&question.palette));
    let _ = writeln!(out, "{}", render_legend());
    let _ = writeln!(out, "{}", render_progress(&question.progress));

    let mut moves = Vec::new();
    if !question.is_first {
        moves.push("prev");
    }
    if !question.is_last {
        moves.push("next");
    }
    moves.extend(["review", "jump <n>", "submit"]);
    let _ = writeln!(out, "Choose an option number, or: {}", moves.join(", "));
    out
}

#[must_use]
pub fn render_palette(tiles: &[PaletteTileVm]) -> String {
    tiles
        .iter()
        .map(|tile| format!("[{}{}]", tile.tone.marker(), tile.number))
        .collect::<Vec<_>>()
        .join(" ")
}

fn render_legend() -> String {
    LEGEND
        .iter()
        .map(|tone| format!("{} {}", tone.marker(), tone.label()))
        .collect::<Vec<_>>()
        .join(" | ")
}

fn render_progress(counts: &StatusCounts) -> String {
    format!(
        "Answered {} | Not answered {} | Marked for review {} | Not visited {}",
        counts.answered, counts.not_answered, counts.review, counts.not_attempted
    )
}

fn render_summary(summary: &SummaryVm) -> String {
    let mut out = String::from("Test completed\n");
    if summary.auto_submitted {
        out.push_str("Time ran out; your answers were submitted automatically.\n");
    }
    let _ = writeln!(out, "\n  {}%  {}", summary.percentage, summary.grade);
    let _ = writeln!(out, "  {}", summary.correct_line);
    let _ = writeln!(
        out,
        "  {}",
        if summary.passed { "PASSED" } else { "NOT PASSED" }
    );
    if let Some(at) = &summary.submitted_at_str {
        let _ = writeln!(out, "  Submitted at {at}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vm::{OptionVm, PaletteTone};
    use quiz_core::ScoreSummary;
    use quiz_core::model::{QuestionId, QuestionStatus};

    fn question_vm() -> QuestionVm {
        QuestionVm {
            id: QuestionId::from(1),
            number: 1,
            total: 2,
            prompt: "Pick B".into(),
            options: vec![
                OptionVm {
                    number: 1,
                    label: "A".into(),
                    selected: false,
                },
                OptionVm {
                    number: 2,
                    label: "B".into(),
                    selected: true,
                },
            ],
            status: QuestionStatus::Answered,
            time_left: "59:58".into(),
            is_first: true,
            is_last: false,
            palette: vec![
                PaletteTileVm {
                    number: 1,
                    tone: PaletteTone::Current,
                },
                PaletteTileVm {
                    number: 2,
                    tone: PaletteTone::NotAttempted,
                },
            ],
            progress: StatusCounts {
                not_attempted: 1,
                answered: 1,
                not_answered: 0,
                review: 0,
            },
        }
    }

    #[test]
    fn question_screen_shows_countdown_selection_and_palette() {
        let text = render_screen(&ScreenVm::Question(question_vm()));

        assert!(text.starts_with("Question 1 of 2    Time left 59:58"));
        assert!(text.contains("  [x] 2) B"));
        assert!(text.contains("  [ ] 1) A"));
        assert!(text.contains("[>1] [ 2]"));
        assert!(text.contains("Answered 1 | Not answered 0 | Marked for review 0 | Not visited 1"));
        assert!(!text.contains("prev"));
        assert!(text.contains("next"));
    }

    #[test]
    fn completed_screen_shows_grade_and_counts() {
        let summary = SummaryVm::new(ScoreSummary::from_counts(2, 3).unwrap(), true);
        let text = render_screen(&ScreenVm::Completed(summary));

        assert!(text.contains("submitted automatically"));
        assert!(text.contains("67%  GOOD"));
        assert!(text.contains("2 out of 3 questions correct"));
        assert!(text.contains("PASSED"));
        assert!(!text.contains("NOT PASSED"));
    }

    #[test]
    fn welcome_screen_states_size_and_time() {
        let text = render_screen(&ScreenVm::Welcome(WelcomeVm {
            question_count: 10,
            minutes: 60,
        }));
        assert!(
            text.contains("This test contains 10 questions and you have 60 minutes to complete it.")
        );
    }
}
