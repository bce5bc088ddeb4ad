//! Store traits consumed by the point service
//!
//! The service never talks to a concrete table. Any pair of stores that
//! satisfies these contracts can back it: the in-memory tables in
//! [`crate::store`], or test doubles that count calls.

use crate::types::{Point, Timestamp, TransactionRecord, TransactionType, UserBalance, UserId};

/// Trait for the current-balance table
///
/// Implementations must be individually thread-safe for concurrent access
/// across distinct keys. A single `get` must never observe a torn write.
pub trait BalanceStore: Send + Sync {
    /// Read the balance of `id`, or `None` if the user was never written
    fn get(&self, id: UserId) -> Option<UserBalance>;

    /// Overwrite the balance of `id` and return the written record
    ///
    /// The returned record carries a fresh timestamp that is never older than
    /// the one it replaces.
    fn put(&self, id: UserId, point: Point) -> UserBalance;
}

/// Trait for the append-only transaction log
pub trait HistoryStore: Send + Sync {
    /// Append a record for `user_id` and return it with its assigned sequence id
    fn append(
        &self,
        user_id: UserId,
        amount: Point,
        tx_type: TransactionType,
        timestamp: Timestamp,
    ) -> TransactionRecord;

    /// All records for `user_id` in append order (possibly empty)
    fn list_by_user(&self, user_id: UserId) -> Vec<TransactionRecord>;
}
