use quiz_core::QuizSnapshot;
use quiz_core::model::{QuestionId, QuestionStatus};
use quiz_core::quiz::StatusCounts;

use crate::vm::palette_vm::{PaletteTileVm, map_palette};
use crate::vm::time_fmt::format_countdown;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionVm {
    /// 1-based, as typed by the user.
    pub number: usize,
    pub label: String,
    pub selected: bool,
}

/// Everything the question screen shows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionVm {
    pub id: QuestionId,
    pub number: usize,
    pub total: usize,
    pub prompt: String,
    pub options: Vec<OptionVm>,
    pub status: QuestionStatus,
    pub time_left: String,
    pub is_first: bool,
    pub is_last: bool,
    pub palette: Vec<PaletteTileVm>,
    pub progress: StatusCounts,
}

impl QuestionVm {
    /// `None` when the snapshot has no current question.
    #[must_use]
    pub fn from_snapshot(snapshot: &QuizSnapshot) -> Option<Self> {
        let question = snapshot.current_question()?;
        let selected = question.selected.as_deref();

        let options = question
            .options
            .iter()
            .enumerate()
            .map(|(index, label)| OptionVm {
                number: index + 1,
                label: label.clone(),
                selected: selected == Some(label.as_str()),
            })
            .collect();

        Some(Self {
            id: question.id.clone(),
            number: snapshot.current_index + 1,
            total: snapshot.question_count(),
            prompt: question.prompt.clone(),
            options,
            status: question.status,
            time_left: format_countdown(snapshot.time_left_secs),
            is_first: snapshot.current_index == 0,
            is_last: snapshot.current_index + 1 == snapshot.question_count(),
            palette: map_palette(snapshot),
            progress: snapshot.status_counts(),
        })
    }
}
