//! Application configuration from CLI flags and environment.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use fibkit_core::calculator::{Algorithm, FibError};
use fibkit_core::constants::DEFAULT_PARALLEL_THRESHOLD;
use fibkit_core::options::Options;

/// FibKit: exact Fibonacci numbers, cross-checked across algorithms.
#[derive(Parser, Debug, Clone)]
#[command(name = "fibkit", version, about)]
#[allow(clippy::struct_excessive_bools)]
pub struct AppConfig {
    /// Index of the Fibonacci number to compute.
    #[arg(short, long, default_value_t = 100_000_000, env = "FIBKIT_N")]
    pub n: u64,

    /// Algorithm to use: fast, matrix, or all.
    #[arg(long, default_value = "all")]
    pub algo: String,

    /// Print every digit of the result.
    #[arg(short, long)]
    pub verbose: bool,

    /// Show bit and digit counts of the result.
    #[arg(short, long)]
    pub details: bool,

    /// Write the decimal result to this file.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Quiet mode (only output the number).
    #[arg(short, long)]
    pub quiet: bool,

    /// Timeout duration (e.g. "500ms", "30s", "5m", "1h").
    #[arg(long, default_value = "5m")]
    pub timeout: String,

    /// Operand size in bits above which multiplications run in parallel.
    #[arg(long, default_value_t = DEFAULT_PARALLEL_THRESHOLD)]
    pub threshold: usize,

    /// Disable the progress bar.
    #[arg(long)]
    pub no_progress: bool,

    /// Generate shell completion.
    #[arg(long, value_enum)]
    pub completion: Option<clap_complete::Shell>,
}

impl AppConfig {
    /// Parse CLI arguments, returning clap's error instead of exiting.
    pub fn try_parse_args() -> Result<Self, clap::Error> {
        <Self as Parser>::try_parse()
    }

    /// Check the values clap cannot check on its own.
    ///
    /// Returns the parsed timeout.
    pub fn validate(&self) -> Result<Duration, FibError> {
        if !self.algo.trim().eq_ignore_ascii_case("all") {
            self.algo.parse::<Algorithm>()?;
        }
        let timeout = parse_duration(&self.timeout)?;
        if timeout.is_zero() {
            return Err(FibError::Config(format!(
                "timeout must be positive, got {:?}",
                self.timeout
            )));
        }
        Ok(timeout)
    }

    /// Calculation options derived from the flags.
    #[must_use]
    pub fn options(&self) -> Options {
        Options::with_parallel_threshold(self.threshold)
    }

    /// Whether the aggregate progress bar should be drawn.
    #[must_use]
    pub fn show_progress(&self) -> bool {
        !self.quiet && !self.no_progress
    }
}

/// Parse a duration string like "500ms", "30s", "5m" or "1h".
/// A bare number is taken as seconds.
pub fn parse_duration(s: &str) -> Result<Duration, FibError> {
    let s = s.trim();
    let invalid = || FibError::Config(format!("invalid duration: {s:?}"));

    let (digits, unit): (&str, fn(u64) -> Option<Duration>) =
        if let Some(ms) = s.strip_suffix("ms") {
            (ms, |v| Some(Duration::from_millis(v)))
        } else if let Some(secs) = s.strip_suffix('s') {
            (secs, |v| Some(Duration::from_secs(v)))
        } else if let Some(mins) = s.strip_suffix('m') {
            (mins, |v| v.checked_mul(60).map(Duration::from_secs))
        } else if let Some(hours) = s.strip_suffix('h') {
            (hours, |v| v.checked_mul(3600).map(Duration::from_secs))
        } else {
            (s, |v| Some(Duration::from_secs(v)))
        };

    let value: u64 = digits.trim().parse().map_err(|_| invalid())?;
    unit(value).ok_or_else(invalid)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(args: &[&str]) -> AppConfig {
        AppConfig::try_parse_from(std::iter::once("fibkit").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn parse_duration_formats() {
        assert_eq!(parse_duration("5m"), Ok(Duration::from_secs(300)));
        assert_eq!(parse_duration("1h"), Ok(Duration::from_secs(3600)));
        assert_eq!(parse_duration("30s"), Ok(Duration::from_secs(30)));
        assert_eq!(parse_duration("500ms"), Ok(Duration::from_millis(500)));
        assert_eq!(parse_duration(" 7 "), Ok(Duration::from_secs(7)));
    }

    #[test]
    fn parse_duration_rejects_garbage() {
        for bad in ["", "abc", "5x", "-1s", "1.5s", "ms"] {
            assert!(
                matches!(parse_duration(bad), Err(FibError::Config(_))),
                "{bad:?} accepted"
            );
        }
        assert!(parse_duration(&format!("{}h", u64::MAX)).is_err());
    }

    #[test]
    fn defaults() {
        let cfg = config(&[]);
        assert_eq!(cfg.algo, "all");
        assert_eq!(cfg.threshold, DEFAULT_PARALLEL_THRESHOLD);
        assert_eq!(cfg.validate(), Ok(Duration::from_secs(300)));
        assert!(cfg.show_progress());
    }

    #[test]
    fn validate_rejects_unknown_algorithm() {
        let cfg = config(&["--algo", "fft"]);
        assert!(matches!(cfg.validate(), Err(FibError::Config(_))));
        assert!(config(&["--algo", "MATRIX"]).validate().is_ok());
        assert!(config(&["--algo", "All"]).validate().is_ok());
    }

    #[test]
    fn validate_rejects_zero_timeout() {
        let cfg = config(&["--timeout", "0s"]);
        assert!(matches!(cfg.validate(), Err(FibError::Config(_))));
    }

    #[test]
    fn zero_threshold_is_passed_through() {
        let cfg = config(&["--threshold", "0"]);
        assert_eq!(cfg.options().parallel_threshold, 0);
    }

    #[test]
    fn quiet_hides_progress() {
        assert!(!config(&["-q"]).show_progress());
        assert!(!config(&["--no-progress"]).show_progress());
    }
}
