//! Concrete observer implementations.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use crossbeam_channel::{Sender, TrySendError};
use parking_lot::Mutex;
use tracing::{debug, info};

use crate::constants::PROGRESS_REPORT_THRESHOLD;
use crate::observer::{FrozenObserver, ProgressObserver};
use crate::progress::ProgressUpdate;

/// Observer that forwards updates through a bounded channel.
///
/// Sends never block: when the consumer falls behind, the update is
/// dropped and counted.
pub struct ChannelObserver {
    sender: Sender<ProgressUpdate>,
    dropped: AtomicU64,
}

impl ChannelObserver {
    /// Create a new channel observer.
    #[must_use]
    pub fn new(sender: Sender<ProgressUpdate>) -> Self {
        Self {
            sender,
            dropped: AtomicU64::new(0),
        }
    }

    /// Number of updates discarded because the channel was full.
    #[must_use]
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl ProgressObserver for ChannelObserver {
    fn on_progress(&self, update: &ProgressUpdate) {
        match self.sender.try_send(update.clone()) {
            Ok(()) | Err(TrySendError::Disconnected(_)) => {}
            Err(TrySendError::Full(_)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    fn freeze(&self) -> FrozenObserver {
        FrozenObserver::new(PROGRESS_REPORT_THRESHOLD)
    }
}

/// Observer that logs progress updates with temporal throttling.
pub struct LoggingObserver {
    min_interval: Duration,
    last_logged: Mutex<Option<Instant>>,
}

impl LoggingObserver {
    /// Create a new logging observer with the given minimum interval.
    #[must_use]
    pub fn new(min_interval_ms: u64) -> Self {
        Self {
            min_interval: Duration::from_millis(min_interval_ms),
            last_logged: Mutex::new(None),
        }
    }
}

impl ProgressObserver for LoggingObserver {
    fn on_progress(&self, update: &ProgressUpdate) {
        if update.done {
            info!(
                calc_index = update.calc_index,
                algorithm = %update.algorithm,
                "Calculation complete"
            );
            return;
        }

        let now = Instant::now();
        {
            let mut last = self.last_logged.lock();
            if last.is_some_and(|t| now.duration_since(t) < self.min_interval) {
                return;
            }
            *last = Some(now);
        }

        debug!(
            calc_index = update.calc_index,
            algorithm = %update.algorithm,
            progress = format!("{:.1}%", update.progress * 100.0),
            step = update.current_step,
            total = update.total_steps,
            "Progress update"
        );
    }

    fn freeze(&self) -> FrozenObserver {
        FrozenObserver::new(PROGRESS_REPORT_THRESHOLD)
    }
}

/// Null object pattern, discards every update.
pub struct NoOpObserver;

impl NoOpObserver {
    /// Create a new no-op observer that discards all progress updates.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for NoOpObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressObserver for NoOpObserver {
    fn on_progress(&self, _update: &ProgressUpdate) {}

    fn freeze(&self) -> FrozenObserver {
        // Only completion gets through.
        FrozenObserver::new(1.0)
    }
}
