use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::ids::QuestionId;

//
// ─── QUESTION STATUS ──────────────────────────────────────────────────────────
//

/// Progress marker attached to every question of a session.
///
/// - `NotAttempted`: initial state, the user has not moved past the question
/// - `Answered`: an option has been selected at least once
/// - `NotAnswered`: the user moved past the question without selecting
/// - `Review`: flagged for later; only a new selection clears it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuestionStatus {
    #[default]
    NotAttempted,
    Answered,
    NotAnswered,
    Review,
}

impl QuestionStatus {
    /// Wire name, matching the serialized form.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            QuestionStatus::NotAttempted => "NOT_ATTEMPTED",
            QuestionStatus::Answered => "ANSWERED",
            QuestionStatus::NotAnswered => "NOT_ANSWERED",
            QuestionStatus::Review => "REVIEW",
        }
    }
}

impl fmt::Display for QuestionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//
// ─── RUNTIME STATE ────────────────────────────────────────────────────────────
//

/// Mutable per-question state owned by the quiz session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionRuntimeState {
    question_id: QuestionId,
    status: QuestionStatus,
    selected: Option<String>,
}

impl QuestionRuntimeState {
    #[must_use]
    pub fn new(question_id: QuestionId) -> Self {
        Self {
            question_id,
            status: QuestionStatus::NotAttempted,
            selected: None,
        }
    }

    #[must_use]
    pub fn question_id(&self) -> &QuestionId {
        &self.question_id
    }

    #[must_use]
    pub fn status(&self) -> QuestionStatus {
        self.status
    }

    #[must_use]
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub(crate) fn select(&mut self, option: String) {
        self.selected = Some(option);
        self.status = QuestionStatus::Answered;
    }

    /// Moving past an untouched question records it as skipped.
    pub(crate) fn mark_skipped(&mut self) {
        if self.selected.is_none() && self.status == QuestionStatus::NotAttempted {
            self.status = QuestionStatus::NotAnswered;
        }
    }

    pub(crate) fn mark_for_review(&mut self) {
        self.status = QuestionStatus::Review;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_uses_screaming_snake_case_on_the_wire() {
        let json = serde_json::to_string(&QuestionStatus::NotAnswered).unwrap();
        assert_eq!(json, r#""NOT_ANSWERED""#);

        let parsed: QuestionStatus = serde_json::from_str(r#""REVIEW""#).unwrap();
        assert_eq!(parsed, QuestionStatus::Review);
        assert_eq!(parsed.to_string(), "REVIEW");
    }

    #[test]
    fn skipping_only_affects_untouched_questions() {
        let mut untouched = QuestionRuntimeState::new(QuestionId::from(1));
        untouched.mark_skipped();
        assert_eq!(untouched.status(), QuestionStatus::NotAnswered);

        let mut flagged = QuestionRuntimeState::new(QuestionId::from(2));
        flagged.mark_for_review();
        flagged.mark_skipped();
        assert_eq!(flagged.status(), QuestionStatus::Review);

        let mut answered = QuestionRuntimeState::new(QuestionId::from(3));
        answered.select("A".into());
        answered.mark_skipped();
        assert_eq!(answered.status(), QuestionStatus::Answered);
    }

    #[test]
    fn review_keeps_the_selection() {
        let mut state = QuestionRuntimeState::new(QuestionId::from(1));
        state.select("B".into());
        state.mark_for_review();

        assert_eq!(state.status(), QuestionStatus::Review);
        assert_eq!(state.selected(), Some("B"));
    }
}
