//! Aggregate progress bar for one or more concurrent calculations.
//!
//! Calculators publish [`ProgressUpdate`]s into a bounded channel; a single
//! consumer averages the latest value of each calculator and redraws an
//! `indicatif` bar at a fixed rate until every sender has been dropped.

use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use tracing::trace;

use fibkit_core::progress::ProgressUpdate;

/// Minimum delay between two redraws.
pub const PROGRESS_REFRESH_RATE: Duration = Duration::from_millis(100);

/// Channel slots per calculator.
pub const CHANNEL_SLOTS_PER_CALCULATOR: usize = 10;

const BAR_LENGTH: u64 = 1000;

/// Latest progress of each calculator.
#[derive(Debug, Clone)]
pub struct AggregateProgress {
    progresses: Vec<f64>,
}

impl AggregateProgress {
    /// Track `num_calculators` calculations, all starting at zero.
    #[must_use]
    pub fn new(num_calculators: usize) -> Self {
        Self {
            progresses: vec![0.0; num_calculators],
        }
    }

    /// Record the latest value for a calculator. Unknown indices are ignored.
    pub fn update(&mut self, index: usize, value: f64) {
        if let Some(slot) = self.progresses.get_mut(index) {
            *slot = value.clamp(0.0, 1.0);
        }
    }

    /// Mean progress across calculators, 0.0 when there are none.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn average(&self) -> f64 {
        if self.progresses.is_empty() {
            return 0.0;
        }
        self.progresses.iter().sum::<f64>() / self.progresses.len() as f64
    }
}

fn new_bar(num_calculators: usize, hidden: bool) -> ProgressBar {
    let bar = ProgressBar::with_draw_target(Some(BAR_LENGTH), ProgressDrawTarget::stderr());
    if hidden {
        bar.set_draw_target(ProgressDrawTarget::hidden());
    }
    let label = if num_calculators > 1 {
        "Average progress"
    } else {
        "Progress"
    };
    let style = ProgressStyle::with_template(
        "{prefix}: {percent:>3}% [{bar:40.green/dim}] {elapsed_precise} ETA {eta}",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .progress_chars("█░ ");
    bar.set_style(style);
    bar.set_prefix(label);
    bar
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn position(progress: f64) -> u64 {
    (progress * BAR_LENGTH as f64).round() as u64
}

/// Consume `updates` until the channel closes, drawing an aggregate bar.
///
/// Returns the final aggregate, which stays below 1.0 when some
/// calculation never completed.
pub fn display_aggregate_progress(
    updates: &Receiver<ProgressUpdate>,
    num_calculators: usize,
    hidden: bool,
) -> AggregateProgress {
    let mut state = AggregateProgress::new(num_calculators);
    if num_calculators == 0 {
        // Still drain so producers never block on a full channel.
        for _ in updates.iter() {}
        return state;
    }

    let bar = new_bar(num_calculators, hidden);
    let mut last_draw = Instant::now();

    loop {
        match updates.recv_timeout(PROGRESS_REFRESH_RATE) {
            Ok(update) => {
                trace!(index = update.calc_index, progress = update.progress, "progress");
                state.update(update.calc_index, update.progress);
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }
        if last_draw.elapsed() >= PROGRESS_REFRESH_RATE {
            bar.set_position(position(state.average()));
            last_draw = Instant::now();
        }
    }

    bar.set_position(position(state.average()));
    if state.average() >= 1.0 {
        bar.finish();
    } else {
        bar.abandon();
    }
    state
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aggregate_average() {
        let mut state = AggregateProgress::new(2);
        assert!(state.average().abs() < f64::EPSILON);
        state.update(0, 1.0);
        assert!((state.average() - 0.5).abs() < f64::EPSILON);
        state.update(1, 0.5);
        assert!((state.average() - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn aggregate_ignores_unknown_index_and_clamps() {
        let mut state = AggregateProgress::new(1);
        state.update(5, 1.0);
        assert!(state.average().abs() < f64::EPSILON);
        state.update(0, 7.0);
        assert!((state.average() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn aggregate_empty() {
        assert!(AggregateProgress::new(0).average().abs() < f64::EPSILON);
    }

    #[test]
    fn display_finishes_when_channel_closes() {
        let (tx, rx) = crossbeam_channel::bounded(20);
        let consumer = std::thread::spawn(move || display_aggregate_progress(&rx, 2, true));
        tx.send(ProgressUpdate::new(0, "FastDoubling", 0.5, 1, 2)).unwrap();
        tx.send(ProgressUpdate::done(0, "FastDoubling")).unwrap();
        tx.send(ProgressUpdate::done(1, "MatrixExponentiation")).unwrap();
        drop(tx);
        let state = consumer.join().unwrap();
        assert!((state.average() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn display_partial_when_cancelled() {
        let (tx, rx) = crossbeam_channel::bounded(20);
        tx.send(ProgressUpdate::new(0, "FastDoubling", 0.4, 4, 10)).unwrap();
        drop(tx);
        let state = display_aggregate_progress(&rx, 1, true);
        assert!((state.average() - 0.4).abs() < f64::EPSILON);
    }

    #[test]
    fn display_with_no_calculators_drains() {
        let (tx, rx) = crossbeam_channel::bounded(2);
        tx.send(ProgressUpdate::done(0, "FastDoubling")).unwrap();
        drop(tx);
        let state = display_aggregate_progress(&rx, 0, true);
        assert!(rx.is_empty());
        assert!(state.average().abs() < f64::EPSILON);
    }

    #[test]
    fn bar_position_scale() {
        assert_eq!(position(0.0), 0);
        assert_eq!(position(0.5), 500);
        assert_eq!(position(1.0), BAR_LENGTH);
    }
}
