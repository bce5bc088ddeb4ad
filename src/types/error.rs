//! Error types for the Rust Point Service
//!
//! This module defines every failure the service and its batch driver can
//! report. Each variant carries enough context for a log line, and
//! [`PointError::kind`] gives callers a machine-checkable category so they can
//! decide whether a retry makes sense.
//!
//! # Error Categories
//!
//! - **Validation**: amount outside the permitted range, or a result that
//!   would not fit in a balance
//! - **Not found**: no balance (or no history) for the requested user
//! - **Insufficient balance**: use amount exceeds the current balance
//! - **Input**: file I/O and CSV parsing failures in the batch driver

use super::history::{Amount, Point, TransactionType, UserId};
use thiserror::Error;

/// Broad category of a [`PointError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request itself is invalid; retry with a corrected amount
    Validation,
    /// The user has not been provisioned
    NotFound,
    /// The user does not hold enough points
    InsufficientBalance,
    /// Reading the batch input failed
    Input,
}

/// Main error type for the point service
///
/// Domain variants are always raised before any store mutation, so a caller
/// that receives one can assume the balance and history are unchanged.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PointError {
    /// Requested amount is outside the range allowed for the operation
    #[error("{tx_type} amount must be between {} and {}", grouped(*min), grouped(*max))]
    InvalidAmount {
        /// Operation that rejected the amount
        tx_type: TransactionType,
        /// The rejected amount
        amount: Amount,
        /// Smallest accepted amount
        min: Point,
        /// Largest accepted amount
        max: Point,
    },

    /// No balance record exists for the user
    #[error("user does not exist: no balance for user {user_id}")]
    UserNotFound {
        /// User ID that was looked up
        user_id: UserId,
    },

    /// The user has no transaction history
    ///
    /// Reported with [`ErrorKind::NotFound`]: a user without history is
    /// indistinguishable from an unknown user at the history store.
    #[error("user does not exist: no transaction history for user {user_id}")]
    NoHistory {
        /// User ID that was looked up
        user_id: UserId,
    },

    /// Use amount exceeds the current balance
    #[error("cannot use more points than currently held: user {user_id} holds {current}, requested {requested}")]
    InsufficientBalance {
        /// User ID
        user_id: UserId,
        /// Balance at the time of the request
        current: Point,
        /// Requested use amount
        requested: Point,
    },

    /// The new balance would not fit in a `Point`
    #[error("Arithmetic overflow in {operation} for user {user_id}")]
    ArithmeticOverflow {
        /// Operation that would overflow
        operation: TransactionType,
        /// User ID
        user_id: UserId,
    },

    /// I/O error occurred while reading input or writing output
    #[error("I/O error: {message}")]
    Io {
        /// Description of the I/O error
        message: String,
    },

    /// A command row could not be parsed
    #[error("CSV parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    Parse {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        /// Description of the parsing error
        message: String,
    },
}

impl From<std::io::Error> for PointError {
    fn from(error: std::io::Error) -> Self {
        PointError::Io {
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for PointError {
    fn from(error: csv::Error) -> Self {
        let line = error.position().map(|pos| pos.line());

        PointError::Parse {
            line,
            message: error.to_string(),
        }
    }
}

impl PointError {
    /// Category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            PointError::InvalidAmount { .. } | PointError::ArithmeticOverflow { .. } => {
                ErrorKind::Validation
            }
            PointError::UserNotFound { .. } | PointError::NoHistory { .. } => ErrorKind::NotFound,
            PointError::InsufficientBalance { .. } => ErrorKind::InsufficientBalance,
            PointError::Io { .. } | PointError::Parse { .. } => ErrorKind::Input,
        }
    }

    /// Create an InvalidAmount error
    pub fn invalid_amount(tx_type: TransactionType, amount: Amount, min: Point, max: Point) -> Self {
        PointError::InvalidAmount {
            tx_type,
            amount,
            min,
            max,
        }
    }

    /// Create a UserNotFound error
    pub fn user_not_found(user_id: UserId) -> Self {
        PointError::UserNotFound { user_id }
    }

    /// Create a NoHistory error
    pub fn no_history(user_id: UserId) -> Self {
        PointError::NoHistory { user_id }
    }

    /// Create an InsufficientBalance error
    pub fn insufficient_balance(user_id: UserId, current: Point, requested: Point) -> Self {
        PointError::InsufficientBalance {
            user_id,
            current,
            requested,
        }
    }

    /// Create an ArithmeticOverflow error
    pub fn arithmetic_overflow(operation: TransactionType, user_id: UserId) -> Self {
        PointError::ArithmeticOverflow { operation, user_id }
    }

    /// Create a Parse error
    pub fn parse(line: Option<u64>, message: impl Into<String>) -> Self {
        PointError::Parse {
            line,
            message: message.into(),
        }
    }
}

// 100000 -> "100,000"
fn grouped(value: Point) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
