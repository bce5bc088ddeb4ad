//! Synchronous processing strategy
//!
//! Streams commands one row at a time from [`SyncReader`] and executes each
//! against a single [`PointService`] on the calling thread. Memory use grows
//! with the number of users and history records, not with the input size.

use crate::core::PointService;
use crate::io::{write_balances_csv, SyncReader};
use crate::store::StoreConfig;
use crate::strategy::{collect_balances, ProcessingStrategy, RunSummary};
use std::collections::BTreeSet;
use std::io::Write;
use std::path::Path;
use tracing::{info, warn};

/// Synchronous processing strategy
///
/// ```no_run
/// use rust_point_service::store::StoreConfig;
/// use rust_point_service::strategy::{ProcessingStrategy, SyncProcessingStrategy};
/// use std::path::Path;
///
/// let strategy = SyncProcessingStrategy::new(StoreConfig::default());
/// let mut output = std::io::stdout();
///
/// strategy.process(Path::new("commands.csv"), &mut output)
///     .expect("Processing failed");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncProcessingStrategy {
    store: StoreConfig,
}

impl SyncProcessingStrategy {
    pub fn new(store: StoreConfig) -> Self {
        Self { store }
    }
}

impl ProcessingStrategy for SyncProcessingStrategy {
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), String> {
        let service = PointService::in_memory(self.store);
        let reader = SyncReader::new(input_path).map_err(|e| e.to_string())?;

        let mut users = BTreeSet::new();
        let mut summary = RunSummary::default();

        for row in reader {
            match row {
                Ok(command) => {
                    users.insert(command.user_id);
                    let result = service.execute(&command);
                    summary.record(command.user_id, &result);
                }
                Err(e) => {
                    warn!(error = %e, "skipping command row");
                    summary.malformed += 1;
                }
            }
        }

        let rows = collect_balances(&service, &users);
        info!(
            applied = summary.applied,
            rejected = summary.rejected,
            malformed = summary.malformed,
            users = rows.len(),
            "finished processing commands"
        );

        write_balances_csv(&rows, output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");
        file
    }

    fn run(content: &str) -> String {
        let file = create_temp_csv(content);
        let mut output = Vec::new();

        SyncProcessingStrategy::default()
            .process(file.path(), &mut output)
            .unwrap();

        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_sync_strategy_charge_and_use() {
        let output = run("type,user,amount\nseed,1,1000\ncharge,1,4000\nseed,2,2000\nuse,2,1000\n");

        assert_eq!(output, "user,point,transactions\n1,5000,1\n2,1000,1\n");
    }

    #[test]
    fn test_sync_strategy_rejections_leave_balance_untouched() {
        let output = run(concat!(
            "type,user,amount\n",
            "seed,1,5000\n",
            "use,1,6000\n",
            "charge,1,999\n",
            "charge,1,100001\n",
            "use,1,5000\n",
        ));

        assert_eq!(output, "user,point,transactions\n1,0,1\n");
    }

    #[test]
    fn test_sync_strategy_omits_unknown_users() {
        let output = run("type,user,amount\ncharge,9,1000\nuse,9,1000\nseed,1,0\n");

        assert_eq!(output, "user,point,transactions\n1,0,0\n");
    }

    #[test]
    fn test_sync_strategy_skips_malformed_rows() {
        let output = run("type,user,amount\nseed,1,0\nrefund,1,100\ncharge,x,1000\ncharge,1,1000\n");

        assert_eq!(output, "user,point,transactions\n1,1000,1\n");
    }

    #[test]
    fn test_sync_strategy_missing_file() {
        let mut output = Vec::new();

        let result = SyncProcessingStrategy::default()
            .process(Path::new("does-not-exist.csv"), &mut output);

        assert!(result.unwrap_err().contains("Failed to open file"));
        assert!(output.is_empty());
    }
}
