//! Batch command types
//!
//! A `PointCommand` is one parsed row of a command file replayed by the
//! processing strategies.

use super::history::{Amount, UserId};

/// Operations a command file can request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    /// Provision or overwrite a user's balance without writing history
    Seed,

    /// Add points to an existing balance
    Charge,

    /// Remove points from an existing balance
    Use,
}

/// A single command read from input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointCommand {
    /// What to do
    pub kind: CommandKind,

    /// Which user it applies to
    pub user_id: UserId,

    /// Requested amount, validated by the service (not by the parser)
    pub amount: Amount,
}
