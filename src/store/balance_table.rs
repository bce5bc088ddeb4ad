//! Thread-safe balance table
//!
//! This module provides the `BalanceTable` struct, which stores the current
//! balance of each user in a `DashMap`.
//!
//! # Design
//!
//! `DashMap` shards its entries behind internal locks, so reads and writes for
//! different users proceed concurrently and a single `get` or `put` for one
//! user is atomic. The table does not serialize read-modify-write sequences;
//! that is the lock registry's job.
//!
//! # Timestamps
//!
//! `put` stamps each record with the current time, but never with a time
//! older than the record it replaces. A wall clock that steps backwards
//! therefore cannot make `updated_at` decrease.

use super::StoreConfig;
use crate::core::traits::BalanceStore;
use crate::types::{now_millis, Point, UserBalance, UserId};
use dashmap::DashMap;

/// Thread-safe current-balance store
#[derive(Debug, Default)]
pub struct BalanceTable {
    /// Balance by user ID
    balances: DashMap<UserId, UserBalance>,

    config: StoreConfig,
}

impl BalanceTable {
    /// Create an empty table with no artificial latency
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    /// Create an empty table with the given configuration
    pub fn with_config(config: StoreConfig) -> Self {
        Self {
            balances: DashMap::new(),
            config,
        }
    }

    /// Number of users with a balance
    pub fn len(&self) -> usize {
        self.balances.len()
    }

    /// Whether no balance has been written
    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }
}

impl BalanceStore for BalanceTable {
    fn get(&self, id: UserId) -> Option<UserBalance> {
        self.config.throttle();
        self.balances.get(&id).map(|entry| *entry.value())
    }

    fn put(&self, id: UserId, point: Point) -> UserBalance {
        self.config.throttle();
        let now = now_millis();
        let mut entry = self
            .balances
            .entry(id)
            .or_insert_with(|| UserBalance::new(id, point, now));

        let record = entry.value_mut();
        record.point = point;
        record.updated_at = record.updated_at.max(now);
        *record
    }
}
