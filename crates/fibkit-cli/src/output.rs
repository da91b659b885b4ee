//! CLI output formatting.

use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;

use num_bigint::BigUint;

use fibkit_orchestration::interfaces::CalculationResult;

/// Results with more digits than this are truncated unless verbose.
pub const TRUNCATION_LIMIT: usize = 100;

/// Digits kept at each end of a truncated result.
pub const DISPLAY_EDGES: usize = 25;

/// Format a decimal string for display, truncating long values.
#[must_use]
pub fn format_result(digits: &str, verbose: bool) -> String {
    if !verbose && digits.len() > TRUNCATION_LIMIT {
        format!(
            "{}...{} ({} digits)",
            &digits[..DISPLAY_EDGES],
            &digits[digits.len() - DISPLAY_EDGES..],
            format_number(digits.len() as u64)
        )
    } else {
        digits.to_string()
    }
}

/// Format a duration for display.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 0.001 {
        format!("{:.2}µs", secs * 1_000_000.0)
    } else if secs < 1.0 {
        format!("{:.2}ms", secs * 1000.0)
    } else if secs < 60.0 {
        format!("{secs:.3}s")
    } else {
        let mins = (secs / 60.0).floor() as u64;
        let remaining = secs - (mins as f64 * 60.0);
        format!("{mins}m{remaining:.1}s")
    }
}

/// Format a number with thousand separators.
#[must_use]
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    for (i, c) in s.chars().enumerate() {
        if i > 0 && (s.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result
}

/// Write the full result block: size metadata followed by the value.
pub fn write_result(
    out: &mut dyn Write,
    algorithm: &str,
    n: u64,
    value: &BigUint,
    duration: Duration,
    verbose: bool,
    details: bool,
) -> io::Result<()> {
    let digits = value.to_string();

    writeln!(out, "\n--- Result ---")?;
    writeln!(out, "Algorithm       : {algorithm}")?;
    if duration > Duration::ZERO {
        writeln!(out, "Duration        : {}", format_duration(duration))?;
    }
    if details {
        writeln!(out, "Binary size     : {} bits", format_number(value.bits()))?;
        writeln!(out, "Decimal digits  : {}", format_number(digits.len() as u64))?;
    }
    writeln!(out, "F({}) = {}", format_number(n), format_result(&digits, verbose))?;
    if !verbose && digits.len() > TRUNCATION_LIMIT {
        writeln!(out, "(use --verbose to print every digit)")?;
    }
    Ok(())
}

/// Write the comparison table for a multi-algorithm run.
pub fn write_comparison(out: &mut dyn Write, results: &[CalculationResult]) -> io::Result<()> {
    let rows: Vec<(&str, String, String)> = results
        .iter()
        .map(|r| {
            let status = match &r.outcome {
                Ok(_) => "OK".to_string(),
                Err(e) => format!("FAILED ({e})"),
            };
            (r.algorithm.as_str(), format_duration(r.duration), status)
        })
        .collect();

    let name_width = rows
        .iter()
        .map(|(name, _, _)| name.len())
        .chain(std::iter::once("Algorithm".len()))
        .max()
        .unwrap_or_default();
    let duration_width = rows
        .iter()
        .map(|(_, d, _)| d.chars().count())
        .chain(std::iter::once("Duration".len()))
        .max()
        .unwrap_or_default();

    writeln!(out, "\n--- Comparison ---")?;
    writeln!(
        out,
        "  {:<name_width$} | {:<duration_width$} | Status",
        "Algorithm", "Duration"
    )?;
    writeln!(
        out,
        "  {}-+-{}-+-{}",
        "-".repeat(name_width),
        "-".repeat(duration_width),
        "-".repeat(20)
    )?;
    for (name, duration, status) in &rows {
        writeln!(out, "  {name:<name_width$} | {duration:<duration_width$} | {status}")?;
    }
    Ok(())
}

/// Write the decimal value to a file.
pub fn write_to_file(path: &Path, value: &BigUint) -> io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    write!(file, "{value}")?;
    file.flush()
}
