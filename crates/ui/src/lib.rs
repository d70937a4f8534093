#![forbid(unsafe_code)]

pub mod intent;
pub mod render;
pub mod vm;

pub use intent::{
    HELP, IntentError, IntentOutcome, IntentParseError, QuizIntent, apply_intent, parse_command,
};
pub use render::render_screen;
pub use vm::{ScreenVm, screen_from_view};
