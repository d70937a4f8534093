mod ids;
mod question;
mod status;

pub use ids::{QuestionId, SessionId};
pub use question::{Question, QuestionError, QuestionRecord};
pub use status::{QuestionRuntimeState, QuestionStatus};
