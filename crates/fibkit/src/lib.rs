//! FibKit library: application logic behind the `fibkit` binary.

pub mod app;
pub mod config;
pub mod errors;
