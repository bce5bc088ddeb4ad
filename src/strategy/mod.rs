//! Processing strategy module for batch command files
//!
//! A strategy owns the whole pipeline for one input file: reading commands,
//! running them through a fresh [`PointService`], and writing the final
//! balances. Strategies are selected at runtime from the CLI.
//!
//! Both strategies produce byte-identical output for the same input.

use crate::cli::StrategyType;
use crate::core::{BalanceStore, HistoryStore, PointService};
use crate::io::BalanceRow;
use crate::store::StoreConfig;
use crate::types::{PointError, UserBalance, UserId};
use std::collections::BTreeSet;
use std::io::Write;
use std::path::Path;
use tracing::warn;

pub mod r#async;
pub mod sync;

pub use self::r#async::{AsyncProcessingStrategy, BatchConfig};
pub use sync::SyncProcessingStrategy;

/// Processing strategy trait for command file pipelines
pub trait ProcessingStrategy: Send + Sync {
    /// Process commands from `input_path` and write final balances to `output`
    ///
    /// # Errors
    ///
    /// Returns an error if the input file cannot be opened, a fatal I/O error
    /// occurs while reading, or the output cannot be written. Rejected or
    /// malformed commands are logged and skipped; they never fail the run.
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), String>;
}

/// Create a processing strategy based on the specified strategy type
///
/// `config` is only used by the async strategy; `None` means defaults.
pub fn create_strategy(
    strategy_type: StrategyType,
    config: Option<BatchConfig>,
    store: StoreConfig,
) -> Box<dyn ProcessingStrategy> {
    match strategy_type {
        StrategyType::Sync => Box::new(SyncProcessingStrategy::new(store)),
        StrategyType::Async => {
            let config = config.unwrap_or_default();
            Box::new(AsyncProcessingStrategy::new(config).with_store_config(store))
        }
    }
}

/// Counters for one processing run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Commands the service accepted
    pub applied: usize,
    /// Commands the service rejected
    pub rejected: usize,
    /// Rows that could not be parsed into a command
    pub malformed: usize,
}

impl RunSummary {
    /// Count one command outcome, logging rejections
    pub fn record(&mut self, user_id: UserId, result: &Result<UserBalance, PointError>) {
        match result {
            Ok(_) => self.applied += 1,
            Err(e) => {
                warn!(user_id, error = %e, kind = ?e.kind(), "command rejected");
                self.rejected += 1;
            }
        }
    }
}

/// Build output rows for every user that ended up with a balance
///
/// Users that only appeared in rejected commands have no balance and are
/// left out.
pub fn collect_balances<B, H>(service: &PointService<B, H>, users: &BTreeSet<UserId>) -> Vec<BalanceRow>
where
    B: BalanceStore,
    H: HistoryStore,
{
    users
        .iter()
        .filter_map(|&user_id| {
            let balance = service.find_balance(user_id).ok()?;
            let transactions = service.find_history(user_id).map_or(0, |h| h.len());
            Some(BalanceRow {
                balance,
                transactions,
            })
        })
        .collect()
}
