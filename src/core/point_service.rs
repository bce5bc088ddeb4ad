//! Point balance orchestration
//!
//! This module provides the `PointService` struct, which validates requests,
//! serializes mutations per user through the [`LockRegistry`], and drives the
//! balance and history stores.
//!
//! # Architecture
//!
//! ```text
//! PointService
//!     ├── Arc<B: BalanceStore>   (current balance per user)
//!     ├── Arc<H: HistoryStore>   (append-only transaction log)
//!     ├── Arc<LockRegistry>      (one lock per user id)
//!     └── PointPolicy            (amount bounds)
//! ```
//!
//! # Mutation protocol
//!
//! `charge` and `use_points` validate the amount first (no store access on
//! rejection), then under the user's lock: read the balance, compute the new
//! total, append the history record, overwrite the balance. Every domain
//! failure is raised before the append, so a rejected request leaves both
//! stores untouched.
//!
//! # Thread Safety
//!
//! The service is cheap to clone and every clone shares the same stores and
//! locks. Requests for different users never wait on each other. Reads are
//! not locked and may observe the state just before or just after an
//! in-flight mutation for the same user.

use std::sync::Arc;

use tracing::debug;

use super::lock_registry::LockRegistry;
use super::policy::PointPolicy;
use super::traits::{BalanceStore, HistoryStore};
use crate::store::{BalanceTable, HistoryTable, StoreConfig};
use crate::types::{
    now_millis, Amount, CommandKind, Point, PointCommand, PointError, TransactionRecord,
    TransactionType, UserBalance, UserId,
};

/// Per-user point balance service
#[derive(Debug)]
pub struct PointService<B = BalanceTable, H = HistoryTable> {
    balances: Arc<B>,
    history: Arc<H>,
    locks: Arc<LockRegistry>,
    policy: PointPolicy,
}

impl<B, H> Clone for PointService<B, H> {
    fn clone(&self) -> Self {
        Self {
            balances: Arc::clone(&self.balances),
            history: Arc::clone(&self.history),
            locks: Arc::clone(&self.locks),
            policy: self.policy,
        }
    }
}

impl PointService<BalanceTable, HistoryTable> {
    /// Create a service backed by fresh in-memory tables
    pub fn in_memory(config: StoreConfig) -> Self {
        Self::new(
            Arc::new(BalanceTable::with_config(config)),
            Arc::new(HistoryTable::with_config(config)),
            Arc::new(LockRegistry::new()),
        )
    }
}

impl Default for PointService<BalanceTable, HistoryTable> {
    fn default() -> Self {
        Self::in_memory(StoreConfig::default())
    }
}

impl<B, H> PointService<B, H>
where
    B: BalanceStore,
    H: HistoryStore,
{
    /// Create a service over the given stores and lock registry
    ///
    /// Pass the same registry to every service that shares these stores;
    /// two registries over one store would not exclude each other.
    pub fn new(balances: Arc<B>, history: Arc<H>, locks: Arc<LockRegistry>) -> Self {
        Self {
            balances,
            history,
            locks,
            policy: PointPolicy::default(),
        }
    }

    /// Replace the amount limits
    pub fn with_policy(mut self, policy: PointPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Lock registry shared by all clones of this service
    pub fn lock_registry(&self) -> &Arc<LockRegistry> {
        &self.locks
    }

    /// Add `amount` points to an existing balance
    ///
    /// # Returns
    ///
    /// * `Ok(UserBalance)` - The balance after the charge
    /// * `Err(PointError::InvalidAmount)` - `amount` outside the charge limits
    /// * `Err(PointError::UserNotFound)` - No balance exists for `user_id`
    /// * `Err(PointError::ArithmeticOverflow)` - The new total does not fit
    pub fn charge(&self, user_id: UserId, amount: Amount) -> Result<UserBalance, PointError> {
        let amount = self.policy.check_charge(amount)?;

        self.apply(user_id, TransactionType::Charge, amount, |current| {
            current
                .point
                .checked_add(amount)
                .ok_or_else(|| PointError::arithmetic_overflow(TransactionType::Charge, user_id))
        })
    }

    /// Remove `amount` points from an existing balance
    ///
    /// # Returns
    ///
    /// * `Ok(UserBalance)` - The balance after the use
    /// * `Err(PointError::InvalidAmount)` - `amount` outside the use limits
    /// * `Err(PointError::UserNotFound)` - No balance exists for `user_id`
    /// * `Err(PointError::InsufficientBalance)` - `amount` exceeds the balance
    pub fn use_points(&self, user_id: UserId, amount: Amount) -> Result<UserBalance, PointError> {
        let amount = self.policy.check_use(amount)?;

        self.apply(user_id, TransactionType::Use, amount, |current| {
            current
                .point
                .checked_sub(amount)
                .ok_or_else(|| PointError::insufficient_balance(user_id, current.point, amount))
        })
    }

    /// Provision or overwrite a balance without recording history
    pub fn seed_balance(&self, user_id: UserId, point: Point) -> UserBalance {
        self.locks.with_lock(user_id, || {
            let seeded = self.balances.put(user_id, point);
            debug!(user_id, point, "seeded balance");
            seeded
        })
    }

    /// Current balance of `user_id`
    pub fn find_balance(&self, user_id: UserId) -> Result<UserBalance, PointError> {
        self.balances
            .get(user_id)
            .ok_or_else(|| PointError::user_not_found(user_id))
    }

    /// Transaction history of `user_id` in the order it was applied
    ///
    /// An empty history is reported as [`PointError::NoHistory`].
    pub fn find_history(&self, user_id: UserId) -> Result<Vec<TransactionRecord>, PointError> {
        let records = self.history.list_by_user(user_id);
        if records.is_empty() {
            return Err(PointError::no_history(user_id));
        }
        Ok(records)
    }

    /// Run one batch command against the service
    ///
    /// Seed commands with a negative amount are rejected as input errors.
    pub fn execute(&self, command: &PointCommand) -> Result<UserBalance, PointError> {
        match command.kind {
            CommandKind::Seed => {
                let point = Point::try_from(command.amount).map_err(|_| {
                    PointError::parse(
                        None,
                        format!("seed amount {} must not be negative", command.amount),
                    )
                })?;
                Ok(self.seed_balance(command.user_id, point))
            }
            CommandKind::Charge => self.charge(command.user_id, command.amount),
            CommandKind::Use => self.use_points(command.user_id, command.amount),
        }
    }

    // Read-compute-append-write under the user's lock. `compute` sees the
    // current balance and returns the new total, or the reason to reject.
    fn apply<F>(
        &self,
        user_id: UserId,
        tx_type: TransactionType,
        amount: Point,
        compute: F,
    ) -> Result<UserBalance, PointError>
    where
        F: FnOnce(&UserBalance) -> Result<Point, PointError>,
    {
        self.locks.with_lock(user_id, || {
            let current = self
                .balances
                .get(user_id)
                .ok_or_else(|| PointError::user_not_found(user_id))?;

            let new_point = compute(&current)?;

            let record = self.history.append(user_id, amount, tx_type, now_millis());
            let updated = self.balances.put(user_id, new_point);

            debug!(
                user_id,
                %tx_type,
                amount,
                sequence_id = record.sequence_id,
                point = updated.point,
                "applied point transaction"
            );
            Ok(updated)
        })
    }
}
