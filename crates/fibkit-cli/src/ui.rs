//! UI helpers for CLI display.

use console::style;

/// Check if color output is disabled via `NO_COLOR` env var.
#[must_use]
pub fn is_color_disabled() -> bool {
    std::env::var_os("NO_COLOR").is_some()
}

/// Print a styled header.
pub fn print_header(text: &str) {
    if is_color_disabled() {
        println!("=== {text} ===");
    } else {
        println!("{}", style(format!("=== {text} ===")).bold().cyan());
    }
}

/// Print an aligned `key : value` line under a header.
pub fn print_field(key: &str, value: &str) {
    if is_color_disabled() {
        println!("  {key:<22}: {value}");
    } else {
        println!("  {:<22}: {}", style(key).dim(), style(value).bold());
    }
}

/// Print a success message.
pub fn print_success(text: &str) {
    if is_color_disabled() {
        println!("[OK] {text}");
    } else {
        println!("{} {text}", style("[OK]").green().bold());
    }
}

/// Print an error message.
pub fn print_error(text: &str) {
    if is_color_disabled() {
        eprintln!("[ERROR] {text}");
    } else {
        eprintln!("{} {text}", style("[ERROR]").red().bold());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn print_functions_do_not_panic() {
        print_header("Configuration");
        print_field("Index", "1,000");
        print_success("All results match");
        print_error("Something went wrong");
    }

    #[test]
    fn print_functions_with_unicode_and_empty() {
        print_header("");
        print_field("Mode", "Fibonacci \u{2192} comparison");
        print_error("");
    }
}
