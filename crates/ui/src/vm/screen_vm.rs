use quiz_core::{QuizPhase, QuizSnapshot};
use services::SessionView;

use crate::vm::question_vm::QuestionVm;
use crate::vm::summary_vm::SummaryVm;

pub const LOADING_NOTICE: &str =
    "The question server runs on a free tier and may take up to a minute to wake up.";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WelcomeVm {
    pub question_count: usize,
    pub minutes: u32,
}

impl WelcomeVm {
    #[must_use]
    pub fn message(&self) -> String {
        format!(
            "This test contains {} questions and you have {} minutes to complete it.",
            self.question_count, self.minutes
        )
    }
}

/// One screen of the quiz front end.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScreenVm {
    Loading { notice: &'static str },
    LoadError { message: String },
    Welcome(WelcomeVm),
    Question(QuestionVm),
    Completed(SummaryVm),
}

#[must_use]
pub fn screen_from_view(view: &SessionView) -> ScreenVm {
    match view {
        SessionView::Loading => ScreenVm::Loading {
            notice: LOADING_NOTICE,
        },
        SessionView::LoadFailed { message } => ScreenVm::LoadError {
            message: message.clone(),
        },
        SessionView::Loaded(snapshot) => screen_from_snapshot(snapshot),
    }
}

#[must_use]
pub fn screen_from_snapshot(snapshot: &QuizSnapshot) -> ScreenVm {
    let welcome = || {
        ScreenVm::Welcome(WelcomeVm {
            question_count: snapshot.question_count(),
            minutes: snapshot.duration_secs.div_ceil(60),
        })
    };

    match snapshot.phase {
        QuizPhase::Ready => welcome(),
        QuizPhase::InProgress => QuestionVm::from_snapshot(snapshot)
            .map_or_else(welcome, ScreenVm::Question),
        QuizPhase::Submitted => SummaryVm::from_snapshot(snapshot)
            .map_or_else(welcome, ScreenVm::Completed),
    }
}
