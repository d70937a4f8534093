use std::sync::Arc;

use async_trait::async_trait;

use quiz_core::model::{QuestionId, QuestionRecord, QuestionStatus};
use quiz_core::quiz::FinalReport;
use quiz_core::time::fixed_clock;
use services::{LoadError, QuestionSource, QuizController, ReportError, ResultSink};
use ui::vm::PaletteTone;
use ui::{
    IntentError, IntentOutcome, QuizIntent, ScreenVm, apply_intent, parse_command, render_screen,
    screen_from_view,
};

struct Bank {
    fail: bool,
}

#[async_trait]
impl QuestionSource for Bank {
    async fn fetch_questions(&self) -> Result<Vec<QuestionRecord>, LoadError> {
        if self.fail {
            return Err(LoadError::Timeout);
        }
        Ok(vec![
            QuestionRecord {
                id: QuestionId::from(1),
                question: "2 + 2?".into(),
                options: vec!["3".into(), "4".into()],
                correct_answer: "4".into(),
            },
            QuestionRecord {
                id: QuestionId::from(2),
                question: "Capital of Italy?".into(),
                options: vec!["Rome".into(), "Milan".into()],
                correct_answer: "Rome".into(),
            },
        ])
    }
}

struct Discard;

#[async_trait]
impl ResultSink for Discard {
    async fn submit_results(&self, _report: &FinalReport) -> Result<(), ReportError> {
        Ok(())
    }
}

fn controller(fail: bool) -> QuizController {
    QuizController::new(Arc::new(Bank { fail }), Arc::new(Discard), 3600, fixed_clock())
}

async fn run(controller: &QuizController, command: &str) -> IntentOutcome {
    let intent = parse_command(command).unwrap();
    apply_intent(controller, intent).await.unwrap()
}

#[tokio::test]
async fn screens_follow_the_test_lifecycle() {
    let controller = controller(false);
    assert!(matches!(
        screen_from_view(&controller.view()),
        ScreenVm::Loading { .. }
    ));

    controller.load().await.unwrap();
    let ScreenVm::Welcome(welcome) = screen_from_view(&controller.view()) else {
        panic!("expected the welcome screen");
    };
    assert_eq!(
        welcome.message(),
        "This test contains 2 questions and you have 60 minutes to complete it."
    );

    run(&controller, "start").await;
    run(&controller, "2").await;
    let ScreenVm::Question(question) = screen_from_view(&controller.view()) else {
        panic!("expected a question screen");
    };
    assert_eq!(question.time_left, "60:00");
    assert_eq!(question.status, QuestionStatus::Answered);
    assert!(question.options[1].selected);
    assert_eq!(question.palette[0].tone, PaletteTone::Current);

    run(&controller, "next").await;
    run(&controller, "review").await;
    let ScreenVm::Question(question) = screen_from_view(&controller.view()) else {
        panic!("expected a question screen");
    };
    assert_eq!(question.palette[0].tone, PaletteTone::Answered);
    assert_eq!(question.palette[1].tone, PaletteTone::Current);
    run(&controller, "jump 1").await;
    let ScreenVm::Question(question) = screen_from_view(&controller.view()) else {
        panic!("expected a question screen");
    };
    assert_eq!(question.palette[1].tone, PaletteTone::Review);

    run(&controller, "submit").await;
    let screen = screen_from_view(&controller.view());
    let ScreenVm::Completed(summary) = &screen else {
        panic!("expected the completed screen");
    };
    assert_eq!(summary.percentage, 50);
    assert_eq!(summary.grade, "NEEDS IMPROVEMENT");
    assert!(!summary.passed);
    assert!(render_screen(&screen).contains("1 out of 2 questions correct"));
}

#[tokio::test]
async fn load_failure_offers_retry() {
    let controller = controller(true);
    assert!(controller.load().await.is_err());

    let screen = screen_from_view(&controller.view());
    assert!(matches!(screen, ScreenVm::LoadError { .. }));
    assert!(render_screen(&screen).contains("retry"));

    let err = apply_intent(&controller, QuizIntent::Retry).await.unwrap_err();
    assert!(matches!(err, IntentError::Controller(_)));
}

#[tokio::test]
async fn unknown_option_number_is_rejected() {
    let controller = controller(false);
    controller.load().await.unwrap();
    run(&controller, "start").await;

    let err = apply_intent(&controller, QuizIntent::Select(5))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        IntentError::NoSuchOption {
            number: 5,
            count: 2
        }
    ));
}

#[tokio::test]
async fn quit_leaves_the_session_alone() {
    let controller = controller(false);
    controller.load().await.unwrap();

    let outcome = apply_intent(&controller, QuizIntent::Quit).await.unwrap();

    assert!(matches!(outcome, IntentOutcome::Quit));
    assert!(matches!(
        screen_from_view(&controller.view()),
        ScreenVm::Welcome(_)
    ));
}
