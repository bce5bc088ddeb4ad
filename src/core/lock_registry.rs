//! Per-user lock registry
//!
//! This module provides the `LockRegistry` struct, which hands out one
//! mutual-exclusion lock per user id so that balance mutations for the same
//! user are serialized while different users proceed in parallel.
//!
//! # Design
//!
//! Locks live in a `DashMap<UserId, Arc<Mutex<()>>>`. The first reference to a
//! user creates its lock through the entry API, which holds the shard lock
//! while inserting, so concurrent first-touch for the same id always converges
//! on a single handle. Handles are never removed: the registry grows with the
//! number of distinct users seen.
//!
//! The registry is constructed explicitly and shared via `Arc`; there is no
//! process-global instance.

use crate::types::UserId;
use dashmap::DashMap;
use std::sync::{Arc, Mutex, PoisonError};

/// Lock guarding one user's mutation sequence
pub type LockHandle = Arc<Mutex<()>>;

/// Lazily populated map of per-user locks
#[derive(Debug, Default)]
pub struct LockRegistry {
    locks: DashMap<UserId, LockHandle>,
}

impl LockRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            locks: DashMap::new(),
        }
    }

    /// Get the lock for `user_id`, creating it on first use
    ///
    /// Every caller asking for the same id receives a clone of the same `Arc`.
    pub fn acquire(&self, user_id: UserId) -> LockHandle {
        Arc::clone(self.locks.entry(user_id).or_default().value())
    }

    /// Run `f` while holding the lock for `user_id`
    ///
    /// The lock is released when `f` returns or unwinds. A lock poisoned by
    /// an earlier panic is reclaimed: it protects no data of its own, and the
    /// stores it serializes access to stay individually consistent.
    pub fn with_lock<T>(&self, user_id: UserId, f: impl FnOnce() -> T) -> T {
        let handle = self.acquire(user_id);
        let _guard = handle.lock().unwrap_or_else(PoisonError::into_inner);
        f()
    }

    /// Number of distinct users that have a lock
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    /// Whether no lock has been created yet
    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}
