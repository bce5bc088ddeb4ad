//! Core business logic module
//!
//! This module contains the point balance components:
//! - `traits` - Store contracts the service consumes
//! - `lock_registry` - One mutual-exclusion lock per user id
//! - `policy` - Amount validation limits
//! - `point_service` - Charge/use/find orchestration
//! - `batch_processor` - Concurrent batch execution partitioned by user

pub mod batch_processor;
pub mod lock_registry;
pub mod point_service;
pub mod policy;
pub mod traits;

pub use batch_processor::{BatchProcessor, ProcessingResult};
pub use lock_registry::{LockHandle, LockRegistry};
pub use point_service::PointService;
pub use policy::{AmountLimits, PointPolicy};
pub use traits::{BalanceStore, HistoryStore};
