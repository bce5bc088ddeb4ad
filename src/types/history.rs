//! Transaction history types for the Rust Point Service
//!
//! This module defines identifiers, the transaction type enum, and the
//! immutable history record appended for every successful charge or use.

use std::fmt;

/// User identifier
///
/// Any signed 64-bit integer is accepted as a user id.
pub type UserId = i64;

/// Point quantity held in a balance or moved by a transaction
pub type Point = u64;

/// Requested transaction amount as received from a caller
///
/// Signed so that negative requests can be rejected by validation instead of
/// failing to parse.
pub type Amount = i64;

/// Milliseconds since the Unix epoch
pub type Timestamp = u64;

/// Transaction types recorded in the history store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionType {
    /// Points added to a balance
    Charge,

    /// Points removed from a balance, bounded by the current balance
    Use,
}

impl TransactionType {
    /// Lowercase name used in messages and logs
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Charge => "charge",
            TransactionType::Use => "use",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of a user's transaction history
///
/// Records are immutable once appended. `sequence_id` is assigned by the
/// history store from a process-wide counter, so for a single user the
/// sequence order is the order in which mutations were applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionRecord {
    /// Store-assigned, strictly increasing sequence number
    pub sequence_id: u64,

    /// The user this transaction applies to
    pub user_id: UserId,

    /// Points moved by the transaction (always positive)
    pub amount: Point,

    /// Whether points were charged or used
    pub tx_type: TransactionType,

    /// Time the transaction was applied
    pub timestamp: Timestamp,
}

impl TransactionRecord {
    /// Signed effect of this record on a balance
    pub fn delta(&self) -> i128 {
        match self.tx_type {
            TransactionType::Charge => i128::from(self.amount),
            TransactionType::Use => -i128::from(self.amount),
        }
    }
}
