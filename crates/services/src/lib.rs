#![forbid(unsafe_code)]

pub mod config;
pub mod controller;
pub mod error;
pub mod question_bank;
pub mod reporter;
pub mod timer;

pub use quiz_core::Clock;

pub use config::QuizConfig;
pub use controller::{QuizController, SessionView};
pub use error::{ControllerError, LoadError, ReportError};
pub use question_bank::{HttpQuestionBank, QuestionBankLoader, QuestionSource};
pub use reporter::{HttpResultReporter, ResultReporter, ResultSink};
pub use timer::{CountdownTimer, TICK_PERIOD, TickControl, TickTarget};
