//! Balance-related types for the Rust Point Service
//!
//! This module defines the UserBalance structure held by the balance store.

use super::history::{Point, Timestamp, UserId};

/// Current point balance of a single user
///
/// A balance is created when a user is seeded and is afterwards only replaced
/// by the balance store while the user's lock is held. It is never deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserBalance {
    /// The user ID this balance belongs to
    pub id: UserId,

    /// Points currently held
    ///
    /// Unsigned, so a balance can never be observed below zero.
    pub point: Point,

    /// Time of the last write in milliseconds since the Unix epoch
    ///
    /// Never decreases for a given user.
    pub updated_at: Timestamp,
}

impl UserBalance {
    /// Create a balance record with the given point total and write time
    pub fn new(id: UserId, point: Point, updated_at: Timestamp) -> Self {
        UserBalance {
            id,
            point,
            updated_at,
        }
    }
}
