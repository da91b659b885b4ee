//! Progress tracking types and cooperative cancellation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::calculator::FibError;
use crate::observer::{FrozenObserver, ProgressObserver};

/// Progress update sent from calculators to observers.
#[derive(Debug, Clone)]
pub struct ProgressUpdate {
    /// Calculator index (for multi-calculator runs).
    pub calc_index: usize,
    /// Name of the algorithm producing this update.
    pub algorithm: &'static str,
    /// Current progress as a fraction in [0.0, 1.0].
    pub progress: f64,
    /// Current iteration/step number.
    pub current_step: u64,
    /// Total number of steps.
    pub total_steps: u64,
    /// Whether this is the final update.
    pub done: bool,
}

impl ProgressUpdate {
    /// Create a new progress update.
    #[must_use]
    pub fn new(
        calc_index: usize,
        algorithm: &'static str,
        progress: f64,
        current: u64,
        total: u64,
    ) -> Self {
        Self {
            calc_index,
            algorithm,
            progress,
            current_step: current,
            total_steps: total,
            done: false,
        }
    }

    /// Create a completion update.
    #[must_use]
    pub fn done(calc_index: usize, algorithm: &'static str) -> Self {
        Self {
            calc_index,
            algorithm,
            progress: 1.0,
            current_step: 0,
            total_steps: 0,
            done: true,
        }
    }
}

/// Cooperative cancellation token with an optional deadline.
///
/// Clones share the same flag, so cancelling any clone cancels them all.
/// A token built with [`CancellationToken::with_timeout`] additionally
/// reports itself as cancelled once its deadline has passed.
///
/// # Example
/// ```
/// use fibkit_core::progress::CancellationToken;
///
/// let token = CancellationToken::new();
/// assert!(!token.is_cancelled());
///
/// token.cancel();
/// assert!(token.is_cancelled());
/// assert!(token.check_cancelled().is_err());
/// ```
#[derive(Clone, Debug)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
    deadline: Option<(Instant, Duration)>,
}

impl CancellationToken {
    /// Create a new cancellation token without a deadline.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
            deadline: None,
        }
    }

    /// Create a token that expires `timeout` from now.
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::new().child_with_timeout(timeout)
    }

    /// Derive a token sharing this token's flag with a new deadline.
    #[must_use]
    pub fn child_with_timeout(&self, timeout: Duration) -> Self {
        Self {
            cancelled: Arc::clone(&self.cancelled),
            deadline: Instant::now()
                .checked_add(timeout)
                .map(|deadline| (deadline, timeout)),
        }
    }

    /// Check if cancellation has been requested or the deadline has passed.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed) || self.is_expired()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Whether the deadline, if any, has passed.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.deadline
            .is_some_and(|(deadline, _)| Instant::now() >= deadline)
    }

    /// Check for cancellation, returning an error if cancelled.
    ///
    /// An explicit `cancel()` wins over an expired deadline.
    /// ```
    /// use fibkit_core::progress::CancellationToken;
    /// use fibkit_core::FibError;
    ///
    /// let token = CancellationToken::new();
    /// assert!(token.check_cancelled().is_ok());
    ///
    /// token.cancel();
    /// assert_eq!(token.check_cancelled(), Err(FibError::Cancelled));
    /// ```
    pub fn check_cancelled(&self) -> Result<(), FibError> {
        if self.cancelled.load(Ordering::Relaxed) {
            return Err(FibError::Cancelled);
        }
        match self.deadline {
            Some((deadline, timeout)) if Instant::now() >= deadline => {
                Err(FibError::Timeout(format!("exceeded {timeout:?}")))
            }
            _ => Ok(()),
        }
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-calculation progress sink handed to the engines.
///
/// Binds the calculation index and algorithm name, clamps values into
/// [0, 1], drops regressions and throttles through the observer's
/// [`FrozenObserver`].
pub struct ProgressReporter<'a> {
    observer: &'a dyn ProgressObserver,
    frozen: FrozenObserver,
    calc_index: usize,
    algorithm: &'static str,
}

impl<'a> ProgressReporter<'a> {
    /// Create a reporter forwarding to `observer`.
    #[must_use]
    pub fn new(observer: &'a dyn ProgressObserver, calc_index: usize, algorithm: &'static str) -> Self {
        Self {
            frozen: observer.freeze(),
            observer,
            calc_index,
            algorithm,
        }
    }

    /// Report a raw fraction of completion.
    pub fn report(&self, progress: f64) {
        self.emit(progress, 0, 0);
    }

    /// Report `current` of `total` steps completed.
    #[allow(clippy::cast_precision_loss)]
    pub fn report_step(&self, current: u64, total: u64) {
        if total == 0 {
            return;
        }
        self.emit(current as f64 / total as f64, current, total);
    }

    /// Emit the final 1.0 update. Never throttled.
    pub fn complete(&self) {
        self.frozen.update(1.0);
        self.observer
            .on_progress(&ProgressUpdate::done(self.calc_index, self.algorithm));
    }

    fn emit(&self, progress: f64, current: u64, total: u64) {
        if progress.is_nan() {
            return;
        }
        let progress = progress.clamp(0.0, 1.0);
        if progress < self.frozen.current() || !self.frozen.should_report(progress) {
            return;
        }
        self.frozen.update(progress);
        self.observer.on_progress(&ProgressUpdate::new(
            self.calc_index,
            self.algorithm,
            progress,
            current,
            total,
        ));
    }
}
