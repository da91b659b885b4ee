//! Observer pattern for progress tracking.
//!
//! Engines never talk to observers directly in their hot loops: they go
//! through a [`FrozenObserver`] snapshot that decides, lock-free, whether a
//! new value is worth forwarding.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::constants::PROGRESS_REPORT_THRESHOLD;
use crate::progress::ProgressUpdate;

/// Observer trait for receiving progress updates.
pub trait ProgressObserver: Send + Sync {
    /// Receive a progress update.
    fn on_progress(&self, update: &ProgressUpdate);

    /// Create a frozen snapshot for lock-free access in hot loops.
    fn freeze(&self) -> FrozenObserver;
}

/// A frozen observer that can be used in hot loops without locks.
///
/// Stores the last forwarded progress as the bit pattern of an `f64`.
pub struct FrozenObserver {
    progress: Arc<AtomicU64>,
    threshold: f64,
}

impl FrozenObserver {
    /// Create a new frozen observer with the given reporting threshold.
    #[must_use]
    pub fn new(threshold: f64) -> Self {
        Self {
            progress: Arc::new(AtomicU64::new(0)),
            threshold,
        }
    }

    /// Check if progress has changed enough to warrant reporting.
    #[inline]
    #[must_use]
    pub fn should_report(&self, new_progress: f64) -> bool {
        let current = f64::from_bits(self.progress.load(Ordering::Relaxed));
        (new_progress - current) >= self.threshold
    }

    /// Update the stored progress value.
    pub fn update(&self, new_progress: f64) {
        self.progress
            .store(new_progress.to_bits(), Ordering::Relaxed);
    }

    /// Get the current progress value.
    #[must_use]
    pub fn current(&self) -> f64 {
        f64::from_bits(self.progress.load(Ordering::Relaxed))
    }
}

/// Fans updates out to every registered observer.
pub struct ProgressSubject {
    observers: RwLock<Vec<Arc<dyn ProgressObserver>>>,
}

impl ProgressSubject {
    /// Create a new subject with no observers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            observers: RwLock::new(Vec::new()),
        }
    }

    /// Register an observer.
    pub fn register(&self, observer: Arc<dyn ProgressObserver>) {
        self.observers.write().push(observer);
    }

    /// Unregister all observers.
    pub fn clear(&self) {
        self.observers.write().clear();
    }

    /// Get the number of registered observers.
    #[must_use]
    pub fn count(&self) -> usize {
        self.observers.read().len()
    }
}

impl Default for ProgressSubject {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressObserver for ProgressSubject {
    fn on_progress(&self, update: &ProgressUpdate) {
        for observer in self.observers.read().iter() {
            observer.on_progress(update);
        }
    }

    fn freeze(&self) -> FrozenObserver {
        FrozenObserver::new(PROGRESS_REPORT_THRESHOLD)
    }
}
