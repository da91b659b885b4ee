//! Error handling and exit codes.

use fibkit_core::calculator::FibError;
use fibkit_core::constants::exit_codes;

/// Map a calculation error to the process exit code.
#[must_use]
pub fn handle_error(err: &FibError) -> i32 {
    match err {
        FibError::Calculation(_) => exit_codes::ERROR_GENERIC,
        FibError::Config(_) => exit_codes::ERROR_CONFIG,
        FibError::Cancelled => exit_codes::ERROR_CANCELED,
        FibError::Timeout(_) => exit_codes::ERROR_TIMEOUT,
        FibError::Mismatch => exit_codes::ERROR_MISMATCH,
    }
}

/// Exit code for a command-line parsing failure.
///
/// `--help` and `--version` also surface as clap errors and must succeed.
#[must_use]
pub fn handle_clap_error(err: &clap::Error) -> i32 {
    if err.use_stderr() {
        exit_codes::ERROR_CONFIG
    } else {
        exit_codes::SUCCESS
    }
}
