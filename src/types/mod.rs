//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `balance`: per-user balance record
//! - `history`: identifiers, transaction types and history records
//! - `command`: batch commands replayed by the processing strategies
//! - `error`: Error types for the point service

pub mod balance;
pub mod command;
pub mod error;
pub mod history;

pub use balance::UserBalance;
pub use command::{CommandKind, PointCommand};
pub use error::{ErrorKind, PointError};
pub use history::{Amount, Point, Timestamp, TransactionRecord, TransactionType, UserId};

use std::time::{SystemTime, UNIX_EPOCH};

/// Current wall-clock time in milliseconds since the Unix epoch
///
/// A clock set before the epoch reads as 0.
pub fn now_millis() -> Timestamp {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as Timestamp)
        .unwrap_or(0)
}
