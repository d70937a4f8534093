use quiz_core::QuizSnapshot;
use quiz_core::model::QuestionStatus;

/// Colour class of a palette tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaletteTone {
    Current,
    Review,
    Answered,
    NotAnswered,
    NotAttempted,
}

impl PaletteTone {
    /// Precedence: the current question wins over any status.
    #[must_use]
    pub fn for_question(status: QuestionStatus, is_current: bool) -> Self {
        if is_current {
            return Self::Current;
        }
        match status {
            QuestionStatus::Review => Self::Review,
            QuestionStatus::Answered => Self::Answered,
            QuestionStatus::NotAnswered => Self::NotAnswered,
            QuestionStatus::NotAttempted => Self::NotAttempted,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Current => "Current",
            Self::Review => "Marked for review",
            Self::Answered => "Answered",
            Self::NotAnswered => "Not answered",
            Self::NotAttempted => "Not visited",
        }
    }

    /// Single-character marker for text front ends.
    #[must_use]
    pub fn marker(self) -> char {
        match self {
            Self::Current => '>',
            Self::Review => '?',
            Self::Answered => '+',
            Self::NotAnswered => '-',
            Self::NotAttempted => ' ',
        }
    }
}

pub const LEGEND: [PaletteTone; 5] = [
    PaletteTone::Current,
    PaletteTone::Answered,
    PaletteTone::NotAnswered,
    PaletteTone::Review,
    PaletteTone::NotAttempted,
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PaletteTileVm {
    /// 1-based.
    pub number: usize,
    pub tone: PaletteTone,
}

#[must_use]
pub fn map_palette(snapshot: &QuizSnapshot) -> Vec<PaletteTileVm> {
    snapshot
        .questions
        .iter()
        .enumerate()
        .map(|(index, question)| PaletteTileVm {
            number: index + 1,
            tone: PaletteTone::for_question(question.status, index == snapshot.current_index),
        })
        .collect()
}
