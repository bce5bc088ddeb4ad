//! Asynchronous batch processing strategy
//!
//! Reads commands in batches and executes each batch with
//! [`BatchProcessor`], which runs different users concurrently on tokio's
//! blocking pool.
//!
//! # Architecture
//!
//! ```text
//! AsyncProcessingStrategy
//!     ├── BatchConfig (batch_size, worker_threads)
//!     ├── StoreConfig (artificial store latency)
//!     ├── AsyncReader (batch CSV reading)
//!     └── BatchProcessor (user partitioning + blocking tasks)
//!         └── PointService (shared stores + per-user locks)
//! ```
//!
//! # Ordering
//!
//! Batches run one after another, and each batch finishes before the next is
//! read. Within a batch, one user's commands run in input order on a single
//! task. A user's commands therefore execute in file order even when they
//! span several batches, and the final state matches the sync strategy.

use crate::core::{BatchProcessor, PointService};
use crate::io::{write_balances_csv, AsyncReader};
use crate::store::StoreConfig;
use crate::strategy::{collect_balances, ProcessingStrategy, RunSummary};
use std::collections::BTreeSet;
use std::io::Write;
use std::path::Path;
use tokio_util::compat::TokioAsyncReadCompatExt;
use tracing::{debug, info, warn};

/// Configuration for batch processing
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchConfig {
    /// Number of commands per batch
    pub batch_size: usize,
    /// Size of the runtime's worker pool and of its blocking pool
    ///
    /// Bounds how many users' commands execute at the same time.
    pub worker_threads: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            worker_threads: num_cpus::get(),
        }
    }
}

impl BatchConfig {
    /// Create a BatchConfig, replacing zero values with the defaults
    pub fn new(batch_size: usize, worker_threads: usize) -> Self {
        let default = Self::default();

        let batch_size = if batch_size == 0 {
            warn!(
                batch_size,
                fallback = default.batch_size,
                "invalid batch size, using default"
            );
            default.batch_size
        } else {
            batch_size
        };

        let worker_threads = if worker_threads == 0 {
            warn!(
                worker_threads,
                fallback = default.worker_threads,
                "invalid worker thread count, using default"
            );
            default.worker_threads
        } else {
            worker_threads
        };

        Self {
            batch_size,
            worker_threads,
        }
    }
}

/// Asynchronous batch processing strategy
#[derive(Debug, Clone, Default)]
pub struct AsyncProcessingStrategy {
    config: BatchConfig,
    store: StoreConfig,
}

impl AsyncProcessingStrategy {
    pub fn new(config: BatchConfig) -> Self {
        Self {
            config,
            store: StoreConfig::default(),
        }
    }

    /// Use `store` for the in-memory tables of each run
    pub fn with_store_config(mut self, store: StoreConfig) -> Self {
        self.store = store;
        self
    }

}

impl ProcessingStrategy for AsyncProcessingStrategy {
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), String> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.config.worker_threads)
            .max_blocking_threads(self.config.worker_threads)
            .build()
            .map_err(|e| format!("Failed to create tokio runtime: {}", e))?;

        runtime.block_on(async {
            let processor = BatchProcessor::new(PointService::in_memory(self.store));

            let file = tokio::fs::File::open(input_path)
                .await
                .map_err(|e| format!("Failed to open file '{}': {}", input_path.display(), e))?;
            let mut reader = AsyncReader::new(file.compat());

            let mut users = BTreeSet::new();
            let mut summary = RunSummary::default();
            let mut batches = 0usize;

            loop {
                let batch = reader.read_batch(self.config.batch_size).await;
                if batch.is_empty() {
                    break;
                }
                batches += 1;
                debug!(batch = batches, size = batch.len(), "processing batch");

                users.extend(batch.iter().map(|command| command.user_id));
                for outcome in processor.process_batch(batch).await? {
                    summary.record(outcome.command.user_id, &outcome.result);
                }
            }
            summary.malformed = reader.rows_skipped();

            let rows = collect_balances(processor.service(), &users);
            info!(
                batches,
                applied = summary.applied,
                rejected = summary.rejected,
                malformed = summary.malformed,
                users = rows.len(),
                "finished processing commands"
            );

            write_balances_csv(&rows, output)
        })
    }
}
