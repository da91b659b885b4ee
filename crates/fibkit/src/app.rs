//! Application entry point and dispatch.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, warn};

use fibkit_cli::output::{format_duration, format_number, write_to_file};
use fibkit_cli::presenter::CLIResultPresenter;
use fibkit_cli::progress::{display_aggregate_progress, CHANNEL_SLOTS_PER_CALCULATOR};
use fibkit_cli::ui;
use fibkit_core::calculator::{Calculator, FibError};
use fibkit_core::constants::exit_codes;
use fibkit_core::observer::{ProgressObserver, ProgressSubject};
use fibkit_core::observers::{ChannelObserver, LoggingObserver};
use fibkit_core::progress::CancellationToken;
use fibkit_core::registry::DefaultFactory;
use fibkit_orchestration::calculator_selection::get_calculators_to_run;
use fibkit_orchestration::interfaces::{CalculationResult, ResultPresenter};
use fibkit_orchestration::orchestrator::{analyze_comparison_results, execute_calculations};

use crate::config::AppConfig;
use crate::errors::handle_error;

/// Minimum delay between two progress log lines in verbose mode.
const LOG_INTERVAL_MS: u64 = 1000;

/// Run the application and return the process exit code.
///
/// Calculation failures are mapped to exit codes; only I/O failures such as
/// an unwritable `--output` path come back as `Err`.
pub fn run(config: &AppConfig) -> Result<i32> {
    if let Some(shell) = config.completion {
        let mut cmd = <AppConfig as clap::CommandFactory>::command();
        fibkit_cli::completion::generate_completion(&mut cmd, shell, &mut std::io::stdout());
        return Ok(exit_codes::SUCCESS);
    }

    let presenter = CLIResultPresenter::new(config.verbose, config.quiet);

    let timeout = match config.validate() {
        Ok(timeout) => timeout,
        Err(e) => {
            presenter.present_error(&e);
            return Ok(handle_error(&e));
        }
    };

    let factory = DefaultFactory::new();
    let calculators = match get_calculators_to_run(&config.algo, &factory) {
        Ok(calculators) => calculators,
        Err(e) => {
            presenter.present_error(&e);
            return Ok(handle_error(&e));
        }
    };

    let cancel = CancellationToken::with_timeout(timeout);
    install_interrupt_handler(&cancel);

    if !config.quiet {
        print_banner(config, &calculators, timeout);
    }

    let mut results = run_with_progress(config, &calculators, &cancel);

    if let [result] = results.as_slice() {
        return present_single(config, &presenter, result);
    }

    let analysis = analyze_comparison_results(&mut results);
    presenter.present_comparison(&results);

    match analysis {
        Ok(value) => {
            if !config.quiet {
                ui::print_success("All results match");
            }
            let fastest = &results[0];
            presenter.present_result(
                &fastest.algorithm,
                config.n,
                &value,
                fastest.duration,
                config.details,
            );
            write_output(config, &value)?;
            Ok(exit_codes::SUCCESS)
        }
        Err(FibError::Mismatch) => {
            presenter.present_error(&FibError::Mismatch);
            Ok(exit_codes::ERROR_MISMATCH)
        }
        Err(e) => {
            // Nothing succeeded: report the first underlying failure.
            let cause = results.iter().find_map(CalculationResult::error).unwrap_or(&e);
            presenter.present_error(cause);
            Ok(handle_error(cause))
        }
    }
}

fn present_single(
    config: &AppConfig,
    presenter: &CLIResultPresenter,
    result: &CalculationResult,
) -> Result<i32> {
    match &result.outcome {
        Ok(value) => {
            presenter.present_result(
                &result.algorithm,
                config.n,
                value,
                result.duration,
                config.details,
            );
            write_output(config, value)?;
            Ok(exit_codes::SUCCESS)
        }
        Err(e) => {
            presenter.present_error(e);
            Ok(handle_error(e))
        }
    }
}

/// Run the calculators while a scoped thread drains progress into the bar.
fn run_with_progress(
    config: &AppConfig,
    calculators: &[Arc<dyn Calculator>],
    cancel: &CancellationToken,
) -> Vec<CalculationResult> {
    let (tx, rx) = crossbeam_channel::bounded(calculators.len() * CHANNEL_SLOTS_PER_CALCULATOR);
    let channel = Arc::new(ChannelObserver::new(tx));

    let subject = ProgressSubject::new();
    subject.register(Arc::clone(&channel) as Arc<dyn ProgressObserver>);
    if config.verbose {
        subject.register(Arc::new(LoggingObserver::new(LOG_INTERVAL_MS)));
    }

    let opts = config.options();
    let hidden = !config.show_progress();

    std::thread::scope(|s| {
        let display = s.spawn(|| display_aggregate_progress(&rx, calculators.len(), hidden));

        let results = execute_calculations(calculators, config.n, &opts, cancel, &subject);

        // Dropping the last sender closes the channel and ends the display loop.
        let dropped = channel.dropped();
        subject.clear();
        drop(channel);

        if display.join().is_err() {
            warn!("progress display thread panicked");
        }
        if dropped > 0 {
            debug!(dropped, "progress updates dropped on a full channel");
        }
        results
    })
}

fn install_interrupt_handler(cancel: &CancellationToken) {
    let token = cancel.clone();
    // Only one handler may be installed per process; a second run keeps the first.
    if let Err(e) = ctrlc::set_handler(move || token.cancel()) {
        debug!(error = %e, "interrupt handler not installed");
    }
}

fn print_banner(config: &AppConfig, calculators: &[Arc<dyn Calculator>], timeout: Duration) {
    let names: Vec<&str> = calculators.iter().map(|c| c.name()).collect();
    let cpus = std::thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get);
    let mode = if calculators.len() > 1 {
        "comparison"
    } else {
        "single"
    };

    ui::print_header("FibKit");
    ui::print_field("Index", &format_number(config.n));
    ui::print_field("Algorithms", &names.join(", "));
    ui::print_field("Mode", mode);
    ui::print_field("Logical CPUs", &cpus.to_string());
    ui::print_field("Parallel threshold", &format!("{} bits", config.threshold));
    ui::print_field("Timeout", &format_duration(timeout));
}

fn write_output(config: &AppConfig, value: &num_bigint::BigUint) -> Result<()> {
    if let Some(path) = &config.output {
        write_to_file(path, value)
            .with_context(|| format!("failed to write result to {}", path.display()))?;
        if !config.quiet {
            ui::print_success(&format!("Result written to {}", path.display()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn config(args: &[&str]) -> AppConfig {
        AppConfig::try_parse_from(std::iter::once("fibkit").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn run_single_algorithm() {
        let cfg = config(&["-n", "1000", "--algo", "fast", "-q"]);
        assert_eq!(run(&cfg).unwrap(), exit_codes::SUCCESS);
    }

    #[test]
    fn run_comparison() {
        let cfg = config(&["-n", "5000", "-q"]);
        assert_eq!(run(&cfg).unwrap(), exit_codes::SUCCESS);
    }

    #[test]
    fn run_rejects_unknown_algorithm() {
        let cfg = config(&["--algo", "fft", "-q"]);
        assert_eq!(run(&cfg).unwrap(), exit_codes::ERROR_CONFIG);
    }

    #[test]
    fn run_rejects_bad_timeout() {
        let cfg = config(&["--timeout", "soon", "-q"]);
        assert_eq!(run(&cfg).unwrap(), exit_codes::ERROR_CONFIG);
    }

    #[test]
    fn run_writes_output_file() {
        let path = std::env::temp_dir().join(format!("fibkit-app-{}.txt", std::process::id()));
        let path_arg = path.to_string_lossy().into_owned();
        let cfg = config(&["-n", "20", "--algo", "matrix", "-q", "-o", &path_arg]);
        assert_eq!(run(&cfg).unwrap(), exit_codes::SUCCESS);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "6765");
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn run_reports_unwritable_output() {
        let cfg = config(&["-n", "20", "-q", "-o", "/nonexistent-dir/fib.txt"]);
        assert!(run(&cfg).is_err());
    }

    #[test]
    fn collect_results_closes_progress() {
        let cfg = config(&["-n", "2000", "--no-progress"]);
        let factory = DefaultFactory::new();
        let calcs = get_calculators_to_run("all", &factory).unwrap();
        let results = run_with_progress(&cfg, &calcs, &CancellationToken::new());
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(CalculationResult::is_success));
    }
}
