//! FibKit: exact Fibonacci calculator.

use fibkit_cli::ui;
use fibkit_core::constants::exit_codes;
use fibkit_lib::config::AppConfig;
use fibkit_lib::{app, errors};
use tracing_subscriber::EnvFilter;

fn main() {
    let config = match AppConfig::try_parse_args() {
        Ok(config) => config,
        Err(e) => {
            let code = errors::handle_clap_error(&e);
            let _ = e.print();
            std::process::exit(code);
        }
    };

    // Logs go to stderr so quiet mode leaves stdout holding only the number.
    let default_level = if config.verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let code = match app::run(&config) {
        Ok(code) => code,
        Err(e) => {
            ui::print_error(&format!("{e:#}"));
            exit_codes::ERROR_GENERIC
        }
    };
    std::process::exit(code);
}
