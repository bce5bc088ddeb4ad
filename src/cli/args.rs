use crate::store::StoreConfig;
use crate::strategy::BatchConfig;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

/// Apply point charge/use commands and print final balances
#[derive(Parser, Debug)]
#[command(name = "point-service")]
#[command(about = "Apply point charge/use commands and print final balances", long_about = None)]
pub struct CliArgs {
    /// Input CSV file path containing point commands
    #[arg(value_name = "INPUT", help = "Path to the input CSV file")]
    pub input_file: PathBuf,

    /// Processing strategy
    #[arg(
        long = "strategy",
        value_name = "STRATEGY",
        default_value = "async",
        help = "Processing strategy: 'sync' for sequential or 'async' for concurrent batches"
    )]
    pub strategy: StrategyType,

    /// Number of commands per batch (async mode only)
    #[arg(
        long = "batch-size",
        value_name = "SIZE",
        help = "Number of commands read and executed per batch (default: 1000)"
    )]
    pub batch_size: Option<usize>,

    /// Runtime thread count (async mode only)
    #[arg(
        long = "workers",
        value_name = "COUNT",
        help = "Threads executing commands; bounds how many users run at once (default: CPU cores)"
    )]
    pub workers: Option<usize>,

    /// Artificial latency for every store call
    #[arg(
        long = "store-latency-ms",
        value_name = "MILLIS",
        default_value_t = 0,
        help = "Sleep this many milliseconds on every store call"
    )]
    pub store_latency_ms: u64,

    /// Log verbosity
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase log verbosity (-v debug, -vv trace)"
    )]
    pub verbose: u8,
}

/// Available processing strategies
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StrategyType {
    Sync,
    Async,
}

impl CliArgs {
    /// Batch configuration for the async strategy
    ///
    /// Unset values take the defaults; zero values are replaced with the
    /// defaults and logged.
    pub fn to_batch_config(&self) -> BatchConfig {
        let default = BatchConfig::default();
        BatchConfig::new(
            self.batch_size.unwrap_or(default.batch_size),
            self.workers.unwrap_or(default.worker_threads),
        )
    }

    /// Store configuration for either strategy
    pub fn to_store_config(&self) -> StoreConfig {
        StoreConfig::with_latency(Duration::from_millis(self.store_latency_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn parse(args: &[&str]) -> CliArgs {
        CliArgs::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_defaults() {
        let args = parse(&["point-service", "commands.csv"]);

        assert_eq!(args.input_file, PathBuf::from("commands.csv"));
        assert_eq!(args.strategy, StrategyType::Async);
        assert_eq!(args.to_batch_config(), BatchConfig::default());
        assert_eq!(args.to_store_config(), StoreConfig::default());
        assert_eq!(args.verbose, 0);
    }

    #[test]
    fn test_full_invocation() {
        let args = parse(&[
            "point-service",
            "--strategy",
            "sync",
            "--batch-size",
            "250",
            "--workers",
            "3",
            "--store-latency-ms",
            "25",
            "-vv",
            "commands.csv",
        ]);

        assert_eq!(args.strategy, StrategyType::Sync);
        assert_eq!(args.to_batch_config(), BatchConfig::new(250, 3));
        assert_eq!(args.to_store_config().latency, Duration::from_millis(25));
        assert_eq!(args.verbose, 2);
    }

    #[rstest]
    #[case::batch_size_only(&["point-service", "--batch-size", "10", "in.csv"], 10, num_cpus::get())]
    #[case::workers_only(&["point-service", "--workers", "2", "in.csv"], 1000, 2)]
    #[case::zero_workers_fall_back(&["point-service", "--workers", "0", "in.csv"], 1000, num_cpus::get())]
    #[case::zero_batch_falls_back(&["point-service", "--batch-size", "0", "in.csv"], 1000, num_cpus::get())]
    fn test_partial_batch_config(
        #[case] args: &[&str],
        #[case] batch_size: usize,
        #[case] worker_threads: usize,
    ) {
        let config = parse(args).to_batch_config();

        assert_eq!(config.batch_size, batch_size);
        assert_eq!(config.worker_threads, worker_threads);
    }

    #[rstest]
    #[case::missing_input(&["point-service"])]
    #[case::unknown_strategy(&["point-service", "--strategy", "parallel", "in.csv"])]
    #[case::negative_latency(&["point-service", "--store-latency-ms", "-5", "in.csv"])]
    #[case::non_numeric_workers(&["point-service", "--workers", "many", "in.csv"])]
    fn test_rejected_arguments(#[case] args: &[&str]) {
        assert!(CliArgs::try_parse_from(args).is_err());
    }
}
