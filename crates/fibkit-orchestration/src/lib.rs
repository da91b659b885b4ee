//! # fibkit-orchestration
//!
//! Runs one or more calculators for the same index side by side, then
//! cross-checks their results.

pub mod calculator_selection;
pub mod interfaces;
pub mod orchestrator;

pub use calculator_selection::get_calculators_to_run;
pub use interfaces::{CalculationResult, ResultPresenter};
pub use orchestrator::{analyze_comparison_results, execute_calculations};
