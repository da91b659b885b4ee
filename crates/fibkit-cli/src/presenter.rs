//! CLI result presenter.

use std::io::{self, Write};
use std::time::Duration;

use num_bigint::BigUint;
use tracing::warn;

use fibkit_core::calculator::FibError;
use fibkit_orchestration::interfaces::{CalculationResult, ResultPresenter};

use crate::output::{write_comparison, write_result};
use crate::ui;

/// Presents results on stdout and errors on stderr.
pub struct CLIResultPresenter {
    verbose: bool,
    quiet: bool,
}

impl CLIResultPresenter {
    #[must_use]
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self { verbose, quiet }
    }

    fn emit(&self, f: impl FnOnce(&mut dyn Write) -> io::Result<()>) {
        let stdout = io::stdout();
        let mut lock = stdout.lock();
        if let Err(e) = f(&mut lock).and_then(|()| lock.flush()) {
            warn!(error = %e, "failed to write output");
        }
    }
}

impl ResultPresenter for CLIResultPresenter {
    fn present_result(
        &self,
        algorithm: &str,
        n: u64,
        result: &BigUint,
        duration: Duration,
        details: bool,
    ) {
        if self.quiet {
            self.emit(|out| writeln!(out, "{result}"));
            return;
        }
        self.emit(|out| write_result(out, algorithm, n, result, duration, self.verbose, details));
    }

    fn present_comparison(&self, results: &[CalculationResult]) {
        if self.quiet {
            return;
        }
        self.emit(|out| write_comparison(out, results));
    }

    fn present_error(&self, error: &FibError) {
        ui::print_error(&error.to_string());
    }
}
