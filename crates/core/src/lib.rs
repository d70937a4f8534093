#![forbid(unsafe_code)]

pub mod error;
pub mod model;
pub mod quiz;
pub mod scoring;
pub mod time;

pub use error::QuizError;
pub use quiz::{QuizPhase, QuizSession, QuizSnapshot, SubmitOutcome, TickOutcome};
pub use scoring::{Grade, ScoreError, ScoreSummary};
pub use time::Clock;
