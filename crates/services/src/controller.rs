use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex as StdMutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;

use quiz_core::model::QuestionId;
use quiz_core::quiz::{QuizSession, QuizSnapshot, SubmitOutcome, TickOutcome};
use quiz_core::{Clock, QuizError};

use crate::config::QuizConfig;
use crate::error::{ControllerError, LoadError};
use crate::question_bank::{HttpQuestionBank, QuestionBankLoader, QuestionSource};
use crate::reporter::{HttpResultReporter, ResultReporter, ResultSink};
use crate::timer::{CountdownTimer, TICK_PERIOD, TickControl, TickTarget};

//
// ─── VIEW ─────────────────────────────────────────────────────────────────────
//

/// What presentation should show, published after every change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionView {
    Loading,
    LoadFailed { message: String },
    Loaded(QuizSnapshot),
}

//
// ─── SHARED STATE ─────────────────────────────────────────────────────────────
//

enum Slot {
    Empty,
    /// A fetch is pending; `attempt` tells abandoned loads apart from newer ones.
    Loading { attempt: u64 },
    Failed,
    Active(ActiveQuiz),
}

struct ActiveQuiz {
    session: QuizSession,
    report: Option<JoinHandle<()>>,
}

/// State shared between the controller and its countdown task.
///
/// `slot` is the single serialisation point: user operations and ticks both
/// hold it for the whole of their mutation.
struct Shared {
    slot: Mutex<Slot>,
    views: watch::Sender<SessionView>,
    reporter: ResultReporter,
    load_attempts: AtomicU64,
}

impl Shared {
    fn publish(&self, view: SessionView) {
        self.views.send_replace(view);
    }

    /// Mark `attempt` failed if it still owns the slot.
    fn abandon_load(&self, slot: &mut Slot, attempt: u64) {
        if matches!(slot, Slot::Loading { attempt: pending } if *pending == attempt) {
            *slot = Slot::Failed;
            self.publish(SessionView::LoadFailed {
                message: "loading was cancelled before it finished".to_string(),
            });
        }
    }
}

/// Releases the `Loading` slot when a `load` future is dropped mid-fetch.
struct PendingLoad {
    shared: Arc<Shared>,
    attempt: u64,
    settled: bool,
}

impl Drop for PendingLoad {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        warn!("question load {} was abandoned", self.attempt);

        let attempt = self.attempt;
        if let Ok(mut slot) = self.shared.slot.try_lock() {
            self.shared.abandon_load(&mut slot, attempt);
            return;
        }
        // Someone holds the slot right now; finish the release asynchronously.
        if let Ok(runtime) = tokio::runtime::Handle::try_current() {
            let shared = Arc::clone(&self.shared);
            runtime.spawn(async move {
                let mut slot = shared.slot.lock().await;
                shared.abandon_load(&mut slot, attempt);
            });
        }
    }
}

#[async_trait]
impl TickTarget for Shared {
    async fn on_tick(&self) -> TickControl {
        let mut slot = self.slot.lock().await;
        let Slot::Active(active) = &mut *slot else {
            return TickControl::Stop;
        };

        match active.session.tick() {
            Ok(TickOutcome::Running { time_left_secs }) => {
                debug!("session {}: {time_left_secs}s left", active.session.id());
                self.publish(SessionView::Loaded(active.session.snapshot()));
                TickControl::Continue
            }
            Ok(TickOutcome::Expired { summary, report }) => {
                info!(
                    "session {}: time is up, auto-submitted with {}/{} correct",
                    active.session.id(),
                    summary.correct(),
                    summary.total()
                );
                active.report = Some(self.reporter.dispatch(report));
                self.publish(SessionView::Loaded(active.session.snapshot()));
                TickControl::Stop
            }
            Err(err) => {
                debug!("countdown stopped: {err}");
                TickControl::Stop
            }
        }
    }
}

//
// ─── CONTROLLER ───────────────────────────────────────────────────────────────
//

/// Owns one test session and serialises every operation on it.
///
/// Lifecycle: `load` → `start` → navigation/selection → `submit` (or the
/// countdown expiring) → drop. Each mutating call publishes a fresh
/// `SessionView` to subscribers and returns the new snapshot.
pub struct QuizController {
    shared: Arc<Shared>,
    loader: QuestionBankLoader,
    clock: Clock,
    duration_secs: u32,
    tick_period: Duration,
    timer: StdMutex<Option<CountdownTimer>>,
}

impl QuizController {
    #[must_use]
    pub fn new(
        source: Arc<dyn QuestionSource>,
        sink: Arc<dyn ResultSink>,
        duration_secs: u32,
        clock: Clock,
    ) -> Self {
        let (views, _) = watch::channel(SessionView::Loading);
        Self {
            shared: Arc::new(Shared {
                slot: Mutex::new(Slot::Empty),
                views,
                reporter: ResultReporter::new(sink),
                load_attempts: AtomicU64::new(0),
            }),
            loader: QuestionBankLoader::new(source),
            clock,
            duration_secs,
            tick_period: TICK_PERIOD,
            timer: StdMutex::new(None),
        }
    }

    /// Controller talking to the HTTP question bank and result collector.
    #[must_use]
    pub fn from_config(config: &QuizConfig, clock: Clock) -> Self {
        Self::new(
            Arc::new(HttpQuestionBank::new(config)),
            Arc::new(HttpResultReporter::new(config)),
            config.duration_secs,
            clock,
        )
    }

    #[must_use]
    pub fn with_tick_period(mut self, period: Duration) -> Self {
        self.tick_period = period;
        self
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionView> {
        self.shared.views.subscribe()
    }

    #[must_use]
    pub fn view(&self) -> SessionView {
        self.shared.views.borrow().clone()
    }

    /// Fetch the question set and build the session.
    ///
    /// No lock is held while the request is pending. A failed load can be
    /// retried, and so can one whose future was dropped before completing.
    ///
    /// # Errors
    ///
    /// Returns `ControllerError::AlreadyLoaded` after a successful load,
    /// `ControllerError::LoadInProgress` while another load is pending and
    /// `ControllerError::Load` when fetching or validation fails.
    pub async fn load(&self) -> Result<QuizSnapshot, ControllerError> {
        let mut pending = {
            let mut slot = self.shared.slot.lock().await;
            match &*slot {
                Slot::Active(_) => return Err(ControllerError::AlreadyLoaded),
                Slot::Loading { .. } => return Err(ControllerError::LoadInProgress),
                Slot::Empty | Slot::Failed => {}
            }
            let attempt = self.shared.load_attempts.fetch_add(1, Ordering::Relaxed);
            *slot = Slot::Loading { attempt };
            PendingLoad {
                shared: Arc::clone(&self.shared),
                attempt,
                settled: false,
            }
        };
        self.shared.publish(SessionView::Loading);

        let loaded = self.loader.load().await.and_then(|questions| {
            QuizSession::new(questions, self.duration_secs, self.clock).map_err(LoadError::from)
        });

        let mut slot = self.shared.slot.lock().await;
        pending.settled = true;
        match loaded {
            Ok(session) => {
                info!(
                    "session {}: ready with {} questions",
                    session.id(),
                    session.question_count()
                );
                let snapshot = session.snapshot();
                *slot = Slot::Active(ActiveQuiz {
                    session,
                    report: None,
                });
                self.shared.publish(SessionView::Loaded(snapshot.clone()));
                Ok(snapshot)
            }
            Err(err) => {
                warn!("failed to load questions: {err}");
                *slot = Slot::Failed;
                self.shared.publish(SessionView::LoadFailed {
                    message: err.to_string(),
                });
                Err(err.into())
            }
        }
    }

    /// Start the test and its countdown. Idempotent while running.
    ///
    /// # Errors
    ///
    /// Returns `ControllerError::NotLoaded` before a successful load and
    /// `ControllerError::Quiz` once submitted.
    pub async fn start(&self) -> Result<QuizSnapshot, ControllerError> {
        let mut slot = self.shared.slot.lock().await;
        let active = active_mut(&mut slot)?;
        let first_start = !active.session.is_started();
        active.session.start()?;

        if first_start {
            info!("session {}: started", active.session.id());
            let target: Arc<dyn TickTarget> = self.shared.clone();
            let timer = CountdownTimer::spawn(target, self.tick_period);
            if let Some(previous) = self.timer_slot().replace(timer) {
                previous.cancel();
            }
        }

        Ok(self.publish_snapshot(&active.session))
    }

    /// # Errors
    ///
    /// See `QuizSession::select_answer`; `ControllerError::NotLoaded` before load.
    pub async fn select_answer(
        &self,
        id: &QuestionId,
        option: &str,
    ) -> Result<QuizSnapshot, ControllerError> {
        self.apply("select_answer", |session| session.select_answer(id, option))
            .await
    }

    /// Select the option at `index` of whichever question is current when the
    /// slot lock is taken.
    ///
    /// # Errors
    ///
    /// See `QuizSession::select_option`; `ControllerError::NotLoaded` before load.
    pub async fn select_option(&self, index: usize) -> Result<QuizSnapshot, ControllerError> {
        self.apply("select_option", |session| session.select_option(index))
            .await
    }

    /// # Errors
    ///
    /// See `QuizSession::advance`; `ControllerError::NotLoaded` before load.
    pub async fn advance(&self) -> Result<QuizSnapshot, ControllerError> {
        self.apply("advance", QuizSession::advance).await
    }

    /// # Errors
    ///
    /// See `QuizSession::retreat`; `ControllerError::NotLoaded` before load.
    pub async fn retreat(&self) -> Result<QuizSnapshot, ControllerError> {
        self.apply("retreat", QuizSession::retreat).await
    }

    /// # Errors
    ///
    /// See `QuizSession::mark_for_review`; `ControllerError::NotLoaded` before load.
    pub async fn mark_for_review(&self) -> Result<QuizSnapshot, ControllerError> {
        self.apply("mark_for_review", QuizSession::mark_for_review)
            .await
    }

    /// # Errors
    ///
    /// See `QuizSession::jump_to`; `ControllerError::NotLoaded` before load.
    pub async fn jump_to(&self, index: usize) -> Result<QuizSnapshot, ControllerError> {
        self.apply("jump_to", |session| session.jump_to(index)).await
    }

    /// Submit the test, stop the countdown and hand the report to the
    /// reporter. Calling it again returns the frozen result without
    /// reporting twice.
    ///
    /// # Errors
    ///
    /// Returns `ControllerError::NotLoaded` before load and
    /// `ControllerError::Quiz` if the test was never started.
    pub async fn submit(&self) -> Result<QuizSnapshot, ControllerError> {
        let mut slot = self.shared.slot.lock().await;
        let active = active_mut(&mut slot)?;

        match active.session.submit()? {
            SubmitOutcome::Submitted { summary, report } => {
                self.cancel_timer();
                info!(
                    "session {}: submitted with {}/{} correct ({}%)",
                    active.session.id(),
                    summary.correct(),
                    summary.total(),
                    summary.percentage()
                );
                active.report = Some(self.shared.reporter.dispatch(report));
            }
            SubmitOutcome::AlreadySubmitted { .. } => {
                debug!("session {}: already submitted", active.session.id());
            }
        }

        Ok(self.publish_snapshot(&active.session))
    }

    /// Wait for an in-flight report delivery, if any.
    pub async fn flush_report(&self) {
        let pending = {
            let mut slot = self.shared.slot.lock().await;
            match &mut *slot {
                Slot::Active(active) => active.report.take(),
                _ => None,
            }
        };

        let Some(handle) = pending else {
            return;
        };
        if let Err(err) = handle.await {
            warn!("result delivery task ended abnormally: {err}");
        }
    }

    /// Snapshot of the loaded session, if any.
    pub async fn snapshot(&self) -> Option<QuizSnapshot> {
        let slot = self.shared.slot.lock().await;
        match &*slot {
            Slot::Active(active) => Some(active.session.snapshot()),
            _ => None,
        }
    }

    // ─── Internals ────────────────────────────────────────────────────────────

    async fn apply<F>(&self, operation: &str, op: F) -> Result<QuizSnapshot, ControllerError>
    where
        F: FnOnce(&mut QuizSession) -> Result<(), QuizError>,
    {
        let mut slot = self.shared.slot.lock().await;
        let active = active_mut(&mut slot)?;
        op(&mut active.session)?;
        debug!(
            "session {}: {operation} -> question {}",
            active.session.id(),
            active.session.current_index() + 1
        );
        Ok(self.publish_snapshot(&active.session))
    }

    fn publish_snapshot(&self, session: &QuizSession) -> QuizSnapshot {
        let snapshot = session.snapshot();
        self.shared.publish(SessionView::Loaded(snapshot.clone()));
        snapshot
    }

    fn timer_slot(&self) -> std::sync::MutexGuard<'_, Option<CountdownTimer>> {
        self.timer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn cancel_timer(&self) {
        if let Some(timer) = self.timer_slot().take() {
            timer.cancel();
        }
    }
}

impl Drop for QuizController {
    fn drop(&mut self) {
        self.cancel_timer();
    }
}

fn active_mut(slot: &mut Slot) -> Result<&mut ActiveQuiz, ControllerError> {
    match slot {
        Slot::Active(active) => Ok(active),
        Slot::Loading { .. } => Err(ControllerError::LoadInProgress),
        Slot::Empty | Slot::Failed => Err(ControllerError::NotLoaded),
    }
}

//
// ─── TESTS ────────────────────────────────────────────────────────────────────
//
