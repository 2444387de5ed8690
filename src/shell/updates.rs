//! Periodic quote refresh.

use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

use super::ApiDemo;

/// Background task refreshing the quote on a fixed interval.
///
/// Only one refresh loop runs at a time; starting again replaces it.
#[derive(Debug, Default)]
pub struct RealtimeUpdates {
    task: Mutex<Option<JoinHandle<()>>>,
}

impl RealtimeUpdates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start refreshing every `period`. The first refresh happens after one period.
    ///
    /// A zero `period` is rejected and any running loop is left untouched.
    /// Returns whether a new loop was started.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(&self, demo: ApiDemo, period: Duration) -> bool {
        if period.is_zero() {
            warn!("Refusing to start real-time updates with a zero interval");
            return false;
        }

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if let Err(e) = demo.fetch_quote().await {
                    error!("Real-time update error: {}", e);
                }
            }
        });

        if let Some(previous) = self.task.lock().replace(handle) {
            previous.abort();
        }
        info!("Real-time updates every {:?}", period);
        true
    }

    /// Stop the refresh loop. Returns `false` if none was running.
    pub fn stop(&self) -> bool {
        match self.task.lock().take() {
            Some(task) => {
                task.abort();
                info!("Real-time updates stopped");
                true
            }
            None => false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.task
            .lock()
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }
}

impl Drop for RealtimeUpdates {
    fn drop(&mut self) {
        if let Some(task) = self.task.get_mut().take() {
            task.abort();
        }
    }
}
