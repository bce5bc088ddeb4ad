//! Point service CLI
//!
//! Applies a CSV file of point commands and prints the final balances.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- commands.csv > balances.csv
//! cargo run -- --strategy sync commands.csv > balances.csv
//! cargo run -- --strategy async --batch-size 2000 --workers 8 commands.csv
//! cargo run -- --store-latency-ms 5 -v commands.csv
//! ```
//!
//! Balances go to stdout; logs go to stderr (filter with `RUST_LOG`).
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (missing arguments, file not found, file not readable, etc.)

use rust_point_service::cli;
use rust_point_service::strategy;
use std::process;
use tracing::error;

fn main() {
    let args = cli::parse_args();
    cli::setup_tracing(args.verbose);

    let config = match args.strategy {
        cli::StrategyType::Async => Some(args.to_batch_config()),
        cli::StrategyType::Sync => None,
    };
    let strategy = strategy::create_strategy(args.strategy, config, args.to_store_config());

    let mut output = std::io::stdout();
    if let Err(e) = strategy.process(&args.input_file, &mut output) {
        error!(error = %e, input = %args.input_file.display(), "processing failed");
        process::exit(1);
    }
}
