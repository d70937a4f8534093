mod report;
mod session;
mod snapshot;

pub use report::{FinalReport, ReportedQuestion};
pub use session::{DEFAULT_DURATION_SECS, QuizSession, SubmitOutcome, TickOutcome};
pub use snapshot::{QuestionSnapshot, QuizPhase, QuizSnapshot, StatusCounts};
