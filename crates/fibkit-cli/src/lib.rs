//! # fibkit-cli
//!
//! Terminal output for the `fibkit` binary: result formatting, the
//! aggregate progress bar, styled messages, and shell completion.

pub mod completion;
pub mod output;
pub mod presenter;
pub mod progress;
pub mod ui;

pub use presenter::CLIResultPresenter;
pub use progress::{display_aggregate_progress, AggregateProgress};
