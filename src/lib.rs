//! Rust Point Service Library
//!
//! # Overview
//!
//! Per-user point balances with charge and use operations. Mutations for one
//! user are serialized through a per-user lock so concurrent requests never
//! lose updates or overdraw a balance; requests for different users run in
//! parallel.
//!
//! # Architecture
//!
//! - [`types`] - Core data types (UserBalance, TransactionRecord, PointError)
//! - [`core`] - Business logic:
//!   - [`core::point_service`] - Validation and read-compute-write orchestration
//!   - [`core::lock_registry`] - Lazily created lock per user id
//!   - [`core::policy`] - Charge and use amount limits
//!   - [`core::batch_processor`] - Concurrent batch execution partitioned by user
//! - [`store`] - Thread-safe in-memory balance and history tables
//! - [`io`] - CSV command input and balance output
//! - [`strategy`] - Sync and async file processing pipelines
//! - [`cli`] - CLI argument parsing and log setup
//!
//! # Operations
//!
//! - **charge**: Add 1,000 to 100,000 points to an existing balance
//! - **use**: Remove 1,000 to 500,000 points, never below zero
//! - **find balance / history**: Read a user's balance or transaction log
//!
//! ```
//! use rust_point_service::{PointService, StoreConfig};
//!
//! let service = PointService::in_memory(StoreConfig::default());
//! service.seed_balance(1, 0);
//!
//! assert_eq!(service.charge(1, 5_000).unwrap().point, 5_000);
//! assert_eq!(service.use_points(1, 2_000).unwrap().point, 3_000);
//! assert_eq!(service.find_history(1).unwrap().len(), 2);
//! ```

pub mod cli;
pub mod core;
pub mod io;
pub mod store;
pub mod strategy;
pub mod types;

pub use self::core::{BalanceStore, BatchProcessor, HistoryStore, LockRegistry, PointPolicy, PointService};
pub use io::write_balances_csv;
pub use store::{BalanceTable, HistoryTable, StoreConfig};
pub use types::{
    Amount, ErrorKind, Point, PointCommand, PointError, TransactionRecord, TransactionType,
    UserBalance, UserId,
};
