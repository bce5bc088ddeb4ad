//! Command-line interface
//!
//! Argument parsing and log subscriber setup for the binary.

mod args;

pub use args::{CliArgs, StrategyType};

use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Parse command-line arguments
///
/// On invalid arguments or `--help`, clap prints the message and exits.
pub fn parse_args() -> CliArgs {
    CliArgs::parse()
}

/// Default log filter for a `-v` count
///
/// `RUST_LOG` takes precedence over this when set.
pub fn default_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "rust_point_service=info,warn",
        1 => "rust_point_service=debug,info",
        _ => "rust_point_service=trace,debug",
    }
}

/// Install a stderr subscriber so stdout carries only the balance CSV
pub fn setup_tracing(verbose: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
