//! Benchmarks for per-user locking and the processing strategies
//!
//! ```bash
//! cargo bench
//! ```
//!
//! - `charge_*` benches run concurrent charges either against one shared user
//!   (every call waits on the same lock) or spread across 64 users.
//! - `process_strategy` processes a generated command file end to end.

use divan::Bencher;
use rust_point_service::cli::StrategyType;
use rust_point_service::strategy::{create_strategy, BatchConfig};
use rust_point_service::{PointService, StoreConfig, UserId};
use std::io::Write;
use std::sync::atomic::{AtomicI64, Ordering};
use tempfile::NamedTempFile;

fn main() {
    divan::main();
}

/// Service whose balances can absorb every charge a bench run issues
fn bench_service(users: UserId) -> PointService {
    let service = PointService::in_memory(StoreConfig::default());
    for user_id in 0..users {
        service.seed_balance(user_id, 0);
    }
    service
}

#[divan::bench(threads = [1, 4, 8])]
fn charge_contended(bencher: Bencher) {
    let service = bench_service(1);

    bencher.bench(|| service.charge(0, 1_000));
}

#[divan::bench(threads = [1, 4, 8])]
fn charge_uncontended(bencher: Bencher) {
    let service = bench_service(64);
    let next_user = AtomicI64::new(0);

    bencher.bench(|| {
        let user_id = next_user.fetch_add(1, Ordering::Relaxed) % 64;
        service.charge(user_id, 1_000)
    });
}

fn command_file(users: UserId, rounds: usize) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    writeln!(file, "type,user,amount").expect("Failed to write header");
    for user_id in 0..users {
        writeln!(file, "seed,{},0", user_id).expect("Failed to write row");
    }
    for round in 0..rounds {
        for user_id in 0..users {
            let kind = if round % 4 == 3 { "use" } else { "charge" };
            writeln!(file, "{},{},1000", kind, user_id).expect("Failed to write row");
        }
    }
    file.flush().expect("Failed to flush temp file");
    file
}

#[divan::bench(args = [StrategyType::Sync, StrategyType::Async])]
fn process_strategy(bencher: Bencher, strategy_type: StrategyType) {
    let file = command_file(100, 50);
    let config = match strategy_type {
        StrategyType::Async => Some(BatchConfig::default()),
        StrategyType::Sync => None,
    };
    let strategy = create_strategy(strategy_type, config, StoreConfig::default());

    bencher.bench_local(|| {
        let mut output = Vec::new();
        strategy
            .process(file.path(), &mut output)
            .expect("Processing failed");
        output
    });
}
