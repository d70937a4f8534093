use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// Countdown resolution.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickControl {
    Continue,
    Stop,
}

/// Receiver of countdown ticks.
#[async_trait]
pub trait TickTarget: Send + Sync {
    async fn on_tick(&self) -> TickControl;
}

/// Periodic task delivering one tick per period until told to stop.
///
/// The first tick fires one full period after spawning.
#[derive(Debug)]
pub struct CountdownTimer {
    handle: JoinHandle<()>,
}

impl CountdownTimer {
    pub fn spawn(target: Arc<dyn TickTarget>, period: Duration) -> Self {
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if target.on_tick().await == TickControl::Stop {
                    break;
                }
            }
        });
        Self { handle }
    }

    /// Abort the task. Ticks already in flight finish; no new ones start.
    pub fn cancel(&self) {
        self.handle.abort();
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}
