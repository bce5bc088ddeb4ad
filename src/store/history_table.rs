//! Thread-safe transaction history table
//!
//! This module provides the `HistoryTable` struct, an append-only log of
//! transaction records grouped by user.
//!
//! # Ordering
//!
//! Sequence ids come from one process-wide counter and are drawn while the
//! user's entry is locked, so within a user's list they are strictly
//! increasing in append order. Across users the interleaving is whatever the
//! scheduler produced.

use super::StoreConfig;
use crate::core::traits::HistoryStore;
use crate::types::{Point, Timestamp, TransactionRecord, TransactionType, UserId};
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe append-only history store
#[derive(Debug)]
pub struct HistoryTable {
    /// Records by user ID, in append order
    records: DashMap<UserId, Vec<TransactionRecord>>,

    /// Next sequence id to hand out
    next_sequence: AtomicU64,

    config: StoreConfig,
}

impl HistoryTable {
    /// Create an empty table with no artificial latency
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    /// Create an empty table with the given configuration
    pub fn with_config(config: StoreConfig) -> Self {
        Self {
            records: DashMap::new(),
            next_sequence: AtomicU64::new(1),
            config,
        }
    }

    /// Total number of records across all users
    pub fn len(&self) -> usize {
        self.records.iter().map(|entry| entry.value().len()).sum()
    }

    /// Whether no record has been appended
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for HistoryTable {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryStore for HistoryTable {
    fn append(
        &self,
        user_id: UserId,
        amount: Point,
        tx_type: TransactionType,
        timestamp: Timestamp,
    ) -> TransactionRecord {
        self.config.throttle();
        let mut entry = self.records.entry(user_id).or_default();

        let record = TransactionRecord {
            sequence_id: self.next_sequence.fetch_add(1, Ordering::Relaxed),
            user_id,
            amount,
            tx_type,
            timestamp,
        };
        entry.value_mut().push(record);
        record
    }

    fn list_by_user(&self, user_id: UserId) -> Vec<TransactionRecord> {
        self.config.throttle();
        self.records
            .get(&user_id)
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }
}
