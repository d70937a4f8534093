use thiserror::Error;

use quiz_core::{QuizError, QuizSnapshot};
use services::{ControllerError, QuizController};

/// User actions on the quiz screens. Numbers are 1-based as displayed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuizIntent {
    Start,
    Select(usize),
    Next,
    Previous,
    Review,
    Jump(usize),
    Submit,
    Retry,
    Quit,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum IntentParseError {
    #[error("type a command, or `help` for the list")]
    Empty,
    #[error("unknown command `{0}`")]
    Unknown(String),
    #[error("`{command}` needs a number")]
    MissingNumber { command: &'static str },
    #[error("`{0}` is not a valid number")]
    InvalidNumber(String),
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IntentError {
    #[error("there is no option {number}; this question has {count}")]
    NoSuchOption { number: usize, count: usize },
    #[error(transparent)]
    Controller(#[from] ControllerError),
}

/// Result of applying an intent.
#[derive(Debug)]
pub enum IntentOutcome {
    Updated(QuizSnapshot),
    Quit,
}

pub const HELP: &str = "\
Commands:
  start          begin the test
  <n> | a <n>    select option n
  next | n       next question
  prev | p       previous question
  review | r     mark the current question for review
  jump <n>       go to question n
  submit         submit the test
  retry          reload the questions after a failure
  quit | q       leave";

/// Parse one line of user input.
///
/// # Errors
///
/// Returns `IntentParseError` for blank, unknown or malformed commands.
pub fn parse_command(input: &str) -> Result<QuizIntent, IntentParseError> {
    let mut words = input.split_whitespace();
    let Some(head) = words.next() else {
        return Err(IntentParseError::Empty);
    };
    let head = head.to_ascii_lowercase();

    if head.chars().all(|c| c.is_ascii_digit()) {
        return parse_number(&head).map(QuizIntent::Select);
    }

    let intent = match head.as_str() {
        "start" | "begin" => QuizIntent::Start,
        "next" | "n" => QuizIntent::Next,
        "prev" | "previous" | "p" => QuizIntent::Previous,
        "review" | "r" => QuizIntent::Review,
        "submit" => QuizIntent::Submit,
        "retry" => QuizIntent::Retry,
        "quit" | "exit" | "q" => QuizIntent::Quit,
        "a" | "answer" | "select" => {
            QuizIntent::Select(required_number(words.next(), "select")?)
        }
        "j" | "jump" | "go" => QuizIntent::Jump(required_number(words.next(), "jump")?),
        _ => return Err(IntentParseError::Unknown(head)),
    };
    Ok(intent)
}

fn required_number(word: Option<&str>, command: &'static str) -> Result<usize, IntentParseError> {
    word.map_or(Err(IntentParseError::MissingNumber { command }), parse_number)
}

fn parse_number(word: &str) -> Result<usize, IntentParseError> {
    word.parse::<usize>()
        .ok()
        .filter(|number| *number > 0)
        .ok_or_else(|| IntentParseError::InvalidNumber(word.to_string()))
}

/// Apply `intent` to the controller.
///
/// # Errors
///
/// Returns `IntentError::NoSuchOption` for an option number the current
/// question does not offer and propagates controller failures.
pub async fn apply_intent(
    controller: &QuizController,
    intent: QuizIntent,
) -> Result<IntentOutcome, IntentError> {
    let snapshot = match intent {
        QuizIntent::Start => controller.start().await?,
        QuizIntent::Select(number) => select_option(controller, number).await?,
        QuizIntent::Next => controller.advance().await?,
        QuizIntent::Previous => controller.retreat().await?,
        QuizIntent::Review => controller.mark_for_review().await?,
        QuizIntent::Jump(number) => controller.jump_to(number.saturating_sub(1)).await?,
        QuizIntent::Submit => controller.submit().await?,
        QuizIntent::Retry => controller.load().await?,
        QuizIntent::Quit => return Ok(IntentOutcome::Quit),
    };
    Ok(IntentOutcome::Updated(snapshot))
}

/// Resolves the option against the question current under the controller's
/// lock, so a tick or another intent cannot move the cursor in between.
async fn select_option(
    controller: &QuizController,
    number: usize,
) -> Result<QuizSnapshot, IntentError> {
    match controller.select_option(number.saturating_sub(1)).await {
        Err(ControllerError::Quiz(QuizError::OptionOutOfRange { count, .. })) => {
            Err(IntentError::NoSuchOption { number, count })
        }
        result => Ok(result?),
    }
}
