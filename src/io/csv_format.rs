//! CSV format handling for point commands and balance output
//!
//! This module centralizes all CSV format concerns, providing:
//! - CsvRecord structure for deserialization
//! - Conversion from CSV records to `PointCommand`
//! - Balance output serialization
//!
//! All functions are pure (no I/O beyond the writer they are handed).

use crate::types::{Amount, CommandKind, PointCommand, UserBalance, UserId};
use serde::Deserialize;
use std::io::Write;

/// CSV record structure for deserialization
///
/// Matches the input CSV format with columns: type, user, amount.
/// The amount is kept as text so that a malformed value is reported with
/// the offending string instead of a generic deserialization error.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CsvRecord {
    #[serde(rename = "type")]
    pub kind: String,
    pub user: UserId,
    pub amount: Option<String>,
}

/// One row of balance output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalanceRow {
    /// Final balance
    pub balance: UserBalance,
    /// Number of history records for the user
    pub transactions: usize,
}

/// Convert a CsvRecord to a PointCommand
///
/// Command types are matched case-insensitively. Every command requires an
/// integer amount. Seed amounts must not be negative; charge and use ranges
/// are left to the service.
pub fn convert_csv_record(csv_record: CsvRecord) -> Result<PointCommand, String> {
    let kind = match csv_record.kind.to_lowercase().as_str() {
        "seed" => CommandKind::Seed,
        "charge" => CommandKind::Charge,
        "use" => CommandKind::Use,
        _ => {
            return Err(format!(
                "Invalid command type: '{}' for user {}",
                csv_record.kind, csv_record.user
            ))
        }
    };

    let amount = match csv_record.amount {
        Some(amount_str) if !amount_str.trim().is_empty() => amount_str
            .trim()
            .parse::<Amount>()
            .map_err(|_| format!("Invalid amount '{}' for user {}", amount_str, csv_record.user))?,
        _ => {
            return Err(format!(
                "{:?} command for user {} requires an amount",
                kind, csv_record.user
            ))
        }
    };

    if kind == CommandKind::Seed && amount < 0 {
        return Err(format!(
            "Invalid amount '{}' for user {}: seed amount must not be negative",
            amount, csv_record.user
        ));
    }

    Ok(PointCommand {
        kind,
        user_id: csv_record.user,
        amount,
    })
}

/// Write balances in CSV format
///
/// Columns: user, point, transactions. Rows are sorted by user ID for
/// deterministic output.
pub fn write_balances_csv(rows: &[BalanceRow], output: &mut dyn Write) -> Result<(), String> {
    use csv::Writer;

    let mut writer = Writer::from_writer(output);

    writer
        .write_record(["user", "point", "transactions"])
        .map_err(|e| format!("Failed to write CSV header: {}", e))?;

    let mut sorted_rows = rows.to_vec();
    sorted_rows.sort_by_key(|row| row.balance.id);

    for row in sorted_rows {
        writer
            .write_record(&[
                row.balance.id.to_string(),
                row.balance.point.to_string(),
                row.transactions.to_string(),
            ])
            .map_err(|e| format!("Failed to write balance record: {}", e))?;
    }

    writer
        .flush()
        .map_err(|e| format!("Failed to flush output: {}", e))?;

    Ok(())
}
