use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use quiz_core::model::{QuestionId, QuestionRecord, QuestionStatus};
use quiz_core::quiz::{FinalReport, QuizPhase};
use quiz_core::time::fixed_now;
use quiz_core::{Grade, QuizError};
use services::{
    Clock, ControllerError, LoadError, QuestionSource, QuizController, ReportError, ResultSink,
    SessionView,
};

struct FixedBank(Vec<QuestionRecord>);

#[async_trait]
impl QuestionSource for FixedBank {
    async fn fetch_questions(&self) -> Result<Vec<QuestionRecord>, LoadError> {
        Ok(self.0.clone())
    }
}

#[derive(Default)]
struct RecordingSink {
    reports: Mutex<Vec<FinalReport>>,
}

impl RecordingSink {
    fn reports(&self) -> Vec<FinalReport> {
        self.reports.lock().unwrap().clone()
    }
}

#[async_trait]
impl ResultSink for RecordingSink {
    async fn submit_results(&self, report: &FinalReport) -> Result<(), ReportError> {
        self.reports.lock().unwrap().push(report.clone());
        Ok(())
    }
}

fn bank() -> Vec<QuestionRecord> {
    [("q1", "A"), ("q2", "C"), ("q3", "B")]
        .into_iter()
        .map(|(id, correct)| QuestionRecord {
            id: QuestionId::from(id),
            question: format!("Prompt for {id}"),
            options: vec!["A".into(), "B".into(), "C".into()],
            correct_answer: correct.into(),
        })
        .collect()
}

fn controller(duration_secs: u32) -> (QuizController, Arc<RecordingSink>) {
    let sink = Arc::new(RecordingSink::default());
    let controller = QuizController::new(
        Arc::new(FixedBank(bank())),
        sink.clone(),
        duration_secs,
        Clock::fixed(fixed_now()),
    );
    (controller, sink)
}

#[tokio::test]
async fn full_test_flow_scores_and_reports_once() {
    let (controller, sink) = controller(3600);
    let views = controller.subscribe();

    controller.load().await.unwrap();
    controller.start().await.unwrap();

    controller
        .select_answer(&QuestionId::from("q1"), "A")
        .await
        .unwrap();
    controller.advance().await.unwrap();
    controller.advance().await.unwrap();
    controller.jump_to(2).await.unwrap();
    controller
        .select_answer(&QuestionId::from("q3"), "B")
        .await
        .unwrap();
    let submitted = controller.submit().await.unwrap();
    controller.flush_report().await;

    let statuses: Vec<_> = submitted.questions.iter().map(|q| q.status).collect();
    assert_eq!(
        statuses,
        [
            QuestionStatus::Answered,
            QuestionStatus::NotAnswered,
            QuestionStatus::Answered
        ]
    );
    let score = submitted.score.unwrap();
    assert_eq!((score.correct(), score.total(), score.percentage()), (2, 3, 67));
    assert_eq!(score.grade(), Grade::Good);
    assert!(score.passed());
    assert!(matches!(&*views.borrow(), SessionView::Loaded(s) if s.phase == QuizPhase::Submitted));

    let again = controller.submit().await.unwrap();
    controller.flush_report().await;
    assert_eq!(again.score, submitted.score);

    let reports = sink.reports();
    assert_eq!(reports.len(), 1);
    assert!(!reports[0].auto_submitted);
    assert_eq!(reports[0].questions[1].selected_answer, None);
}

#[tokio::test]
async fn submitted_session_rejects_further_changes() {
    let (controller, _sink) = controller(3600);
    controller.load().await.unwrap();
    controller.start().await.unwrap();
    controller.submit().await.unwrap();

    let err = controller
        .select_answer(&QuestionId::from("q2"), "C")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ControllerError::Quiz(QuizError::InvalidState {
            phase: QuizPhase::Submitted,
            ..
        })
    ));
    assert!(controller.start().await.is_err());
}

#[tokio::test(start_paused = true)]
async fn countdown_expiry_submits_and_reports_once() {
    let (controller, sink) = controller(5);
    controller.load().await.unwrap();
    controller.start().await.unwrap();
    controller.mark_for_review().await.unwrap();

    tokio::time::sleep(Duration::from_millis(2_500)).await;
    assert_eq!(controller.snapshot().await.unwrap().time_left_secs, 3);

    tokio::time::sleep(Duration::from_secs(5)).await;
    controller.flush_report().await;

    let snapshot = controller.snapshot().await.unwrap();
    assert_eq!(snapshot.phase, QuizPhase::Submitted);
    assert_eq!(snapshot.time_left_secs, 0);
    assert!(snapshot.auto_submitted);
    assert_eq!(snapshot.questions[0].status, QuestionStatus::Review);
    assert_eq!(snapshot.score.unwrap().correct(), 0);

    controller.submit().await.unwrap();
    controller.flush_report().await;
    let reports = sink.reports();
    assert_eq!(reports.len(), 1);
    assert!(reports[0].auto_submitted);
}

#[tokio::test(start_paused = true)]
async fn manual_submit_stops_the_countdown() {
    let (controller, _sink) = controller(60);
    controller.load().await.unwrap();
    controller.start().await.unwrap();

    tokio::time::sleep(Duration::from_millis(1_500)).await;
    controller.submit().await.unwrap();
    tokio::time::sleep(Duration::from_secs(30)).await;

    let snapshot = controller.snapshot().await.unwrap();
    assert_eq!(snapshot.time_left_secs, 59);
    assert!(!snapshot.auto_submitted);
}

#[tokio::test]
async fn navigation_stays_put_at_the_edges() {
    let (controller, _sink) = controller(3600);
    controller.load().await.unwrap();
    controller.start().await.unwrap();

    assert_eq!(controller.retreat().await.unwrap().current_index, 0);
    controller.jump_to(2).await.unwrap();
    let at_end = controller.advance().await.unwrap();
    assert_eq!(at_end.current_index, 2);
    assert_eq!(at_end.questions[2].status, QuestionStatus::NotAnswered);

    let snapshot = controller.jump_to(0).await.unwrap();
    assert_eq!(snapshot.current_index, 0);
    assert_eq!(snapshot.questions[1].status, QuestionStatus::NotAttempted);
    assert!(!snapshot.questions[1].visited);
    assert!(snapshot.questions[2].visited);
}
