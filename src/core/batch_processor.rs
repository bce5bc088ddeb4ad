//! Batch execution with user-based partitioning
//!
//! This module provides the `BatchProcessor` struct, which runs a batch of
//! commands against a [`PointService`] with one blocking task per user.
//!
//! # Design
//!
//! Commands for one user run in input order on a single task. Commands for
//! different users run concurrently on tokio's blocking pool; the service's
//! per-user locks make that safe, and the partitioning keeps the outcome
//! identical to a sequential replay of the same input.
//!
//! # Architecture
//!
//! ```text
//! BatchProcessor
//!     └── PointService  (shared stores + lock registry)
//! ```

use std::collections::HashMap;

use tracing::error;

use super::point_service::PointService;
use super::traits::{BalanceStore, HistoryStore};
use crate::store::{BalanceTable, HistoryTable};
use crate::types::{PointCommand, PointError, UserBalance, UserId};

/// Outcome of one command
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessingResult {
    /// The command that was executed
    pub command: PointCommand,

    /// Balance after the command, or the reason it was rejected
    pub result: Result<UserBalance, PointError>,
}

/// Batch processor with user-based partitioning
#[derive(Debug)]
pub struct BatchProcessor<B = BalanceTable, H = HistoryTable> {
    service: PointService<B, H>,
}

impl<B, H> Clone for BatchProcessor<B, H> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
        }
    }
}

impl<B, H> BatchProcessor<B, H>
where
    B: BalanceStore + 'static,
    H: HistoryStore + 'static,
{
    pub fn new(service: PointService<B, H>) -> Self {
        Self { service }
    }

    /// Service the batches run against
    pub fn service(&self) -> &PointService<B, H> {
        &self.service
    }

    /// Split a batch into per-user command lists
    ///
    /// Every command lands in exactly one list, and each list keeps the
    /// relative order the commands had in `batch`.
    pub fn partition_by_user(&self, batch: Vec<PointCommand>) -> HashMap<UserId, Vec<PointCommand>> {
        let mut user_batches: HashMap<UserId, Vec<PointCommand>> = HashMap::new();

        for command in batch {
            user_batches.entry(command.user_id).or_default().push(command);
        }

        user_batches
    }

    /// Execute one user's commands in order
    ///
    /// A rejected command is recorded in its result and does not stop the
    /// ones after it.
    pub fn process_user_commands(&self, commands: Vec<PointCommand>) -> Vec<ProcessingResult> {
        commands
            .into_iter()
            .map(|command| ProcessingResult {
                result: self.service.execute(&command),
                command,
            })
            .collect()
    }

    /// Execute a batch, one blocking task per user
    ///
    /// Resolves once every task has finished. Results are grouped by user in
    /// no particular user order.
    ///
    /// # Errors
    ///
    /// Returns an error if any user's task panicked or was cancelled. The
    /// other tasks still run to completion, but the batch as a whole is
    /// failed: its results are incomplete.
    pub async fn process_batch(
        &self,
        batch: Vec<PointCommand>,
    ) -> Result<Vec<ProcessingResult>, String> {
        let user_batches = self.partition_by_user(batch);

        let mut tasks = Vec::with_capacity(user_batches.len());
        for (user_id, commands) in user_batches {
            let processor = self.clone();
            let task = tokio::task::spawn_blocking(move || processor.process_user_commands(commands));
            tasks.push((user_id, task));
        }

        let mut results = Vec::new();
        let mut failed = Vec::new();
        for (user_id, task) in tasks {
            match task.await {
                Ok(user_results) => results.extend(user_results),
                Err(e) => {
                    error!(user_id, error = %e, "command task failed");
                    failed.push(user_id);
                }
            }
        }

        if failed.is_empty() {
            Ok(results)
        } else {
            failed.sort_unstable();
            Err(format!("Command execution failed for users {:?}", failed))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LockRegistry;
    use crate::store::StoreConfig;
    use crate::types::{CommandKind, ErrorKind, Point};
    use std::sync::Arc;
    use std::time::Duration;

    fn command(kind: CommandKind, user_id: UserId, amount: i64) -> PointCommand {
        PointCommand {
            kind,
            user_id,
            amount,
        }
    }

    fn processor() -> BatchProcessor {
        BatchProcessor::new(PointService::in_memory(StoreConfig::default()))
    }

    #[test]
    fn test_partition_by_user_empty_batch() {
        assert!(processor().partition_by_user(vec![]).is_empty());
    }

    #[test]
    fn test_partition_by_user_keeps_relative_order() {
        let batch = vec![
            command(CommandKind::Seed, 1, 1_000),
            command(CommandKind::Seed, 2, 2_000),
            command(CommandKind::Charge, 1, 3_000),
            command(CommandKind::Use, 3, 1_000),
            command(CommandKind::Use, 2, 1_500),
        ];

        let partitioned = processor().partition_by_user(batch);

        assert_eq!(partitioned.len(), 3);
        let user1: Vec<_> = partitioned[&1].iter().map(|c| c.kind).collect();
        assert_eq!(user1, vec![CommandKind::Seed, CommandKind::Charge]);
        let user2: Vec<_> = partitioned[&2].iter().map(|c| c.amount).collect();
        assert_eq!(user2, vec![2_000, 1_500]);
        assert_eq!(partitioned[&3].len(), 1);
    }

    #[test]
    fn test_process_user_commands_continues_after_rejection() {
        let processor = processor();

        let results = processor.process_user_commands(vec![
            command(CommandKind::Charge, 1, 1_000),
            command(CommandKind::Seed, 1, 0),
            command(CommandKind::Use, 1, 1_000),
            command(CommandKind::Charge, 1, 2_000),
        ]);

        let outcomes: Vec<_> = results
            .iter()
            .map(|r| r.result.as_ref().map(|b| b.point).map_err(|e| e.kind()))
            .collect();
        assert_eq!(
            outcomes,
            vec![
                Err(ErrorKind::NotFound),
                Ok(0),
                Err(ErrorKind::InsufficientBalance),
                Ok(2_000),
            ]
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_process_batch_applies_every_command() {
        let processor = BatchProcessor::new(PointService::in_memory(
            StoreConfig::with_latency(Duration::from_millis(1)),
        ));
        let mut batch = Vec::new();
        for user_id in 1..=5 {
            batch.push(command(CommandKind::Seed, user_id, 0));
        }
        for _ in 0..10 {
            for user_id in 1..=5 {
                batch.push(command(CommandKind::Charge, user_id, 1_000));
            }
        }

        let results = processor.process_batch(batch).await.unwrap();

        assert_eq!(results.len(), 55);
        assert!(results.iter().all(|r| r.result.is_ok()));
        for user_id in 1..=5 {
            let balance = processor.service().find_balance(user_id).unwrap();
            assert_eq!(balance.point, 10_000);
            assert_eq!(processor.service().find_history(user_id).unwrap().len(), 10);
        }
    }

    #[tokio::test]
    async fn test_process_batch_preserves_per_user_order() {
        let processor = processor();

        // Use only succeeds if the seed and charge before it already ran.
        let results = processor
            .process_batch(vec![
                command(CommandKind::Seed, 7, 0),
                command(CommandKind::Charge, 7, 5_000),
                command(CommandKind::Use, 7, 5_000),
            ])
            .await
            .unwrap();

        assert!(results.iter().all(|r| r.result.is_ok()));
        assert_eq!(processor.service().find_balance(7).unwrap().point, 0);
    }

    /// Balance store whose writes for one user panic
    #[derive(Debug, Default)]
    struct FailingBalances {
        inner: BalanceTable,
    }

    const BROKEN_USER: UserId = 2;

    impl BalanceStore for FailingBalances {
        fn get(&self, id: UserId) -> Option<UserBalance> {
            self.inner.get(id)
        }

        fn put(&self, id: UserId, point: Point) -> UserBalance {
            if id == BROKEN_USER {
                panic!("balance write failed for user {}", id);
            }
            self.inner.put(id, point)
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_process_batch_fails_when_a_user_task_panics() {
        let service = PointService::new(
            Arc::new(FailingBalances::default()),
            Arc::new(HistoryTable::new()),
            Arc::new(LockRegistry::new()),
        );
        let processor = BatchProcessor::new(service);

        let result = processor
            .process_batch(vec![
                command(CommandKind::Seed, 1, 0),
                command(CommandKind::Seed, BROKEN_USER, 0),
                command(CommandKind::Charge, BROKEN_USER, 1_000),
                command(CommandKind::Charge, BROKEN_USER, 1_000),
            ])
            .await;

        let err = result.unwrap_err();
        assert!(err.contains("[2]"), "unexpected error: {}", err);
        // the healthy user's task still ran
        assert_eq!(processor.service().find_balance(1).unwrap().point, 0);
    }
}
