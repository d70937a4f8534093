use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{QuestionId, QuestionStatus, SessionId};
use crate::scoring::ScoreSummary;

/// Body sent to the result collector once a test is submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalReport {
    pub session_id: SessionId,
    pub auto_submitted: bool,
    pub started_at: Option<DateTime<Utc>>,
    pub submitted_at: DateTime<Utc>,
    pub score: ScoreSummary,
    pub questions: Vec<ReportedQuestion>,
}

/// One question of the final report, annotated with its final state.
///
/// The collector reads the selection from `selectedAnswers`; it is omitted for
/// questions left unanswered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportedQuestion {
    pub id: QuestionId,
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: String,
    pub status: QuestionStatus,
    #[serde(
        rename = "selectedAnswers",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub selected_answer: Option<String>,
}
