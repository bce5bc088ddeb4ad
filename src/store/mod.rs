//! In-memory store implementations
//!
//! This module provides thread-safe tables satisfying the store traits in
//! [`crate::core::traits`]:
//!
//! - **BalanceTable**: current balance per user, backed by `DashMap`
//! - **HistoryTable**: append-only per-user transaction log, backed by `DashMap`
//!
//! Both tables can simulate a slow external store by sleeping for a fixed
//! duration on every call (see [`StoreConfig`]). With latency enabled,
//! unsynchronized read-modify-write sequences interleave readily, which is
//! what the per-user locks exist to prevent.

pub mod balance_table;
pub mod history_table;

pub use balance_table::BalanceTable;
pub use history_table::HistoryTable;

use std::time::Duration;

/// Configuration shared by the in-memory tables
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreConfig {
    /// Artificial delay applied to every store call
    pub latency: Duration,
}

impl StoreConfig {
    /// Create a configuration with the given per-call latency
    pub fn with_latency(latency: Duration) -> Self {
        Self { latency }
    }

    pub(crate) fn throttle(&self) {
        if !self.latency.is_zero() {
            std::thread::sleep(self.latency);
        }
    }
}
