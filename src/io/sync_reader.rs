//! Synchronous CSV reader with iterator interface
//!
//! Provides a streaming iterator over point commands from a CSV file.
//! Delegates CSV format concerns to the csv_format module.
//!
//! # Iterator Interface
//!
//! SyncReader implements the Iterator trait, yielding
//! `Result<PointCommand, PointError>` for each CSV row:
//!
//! ```no_run
//! use rust_point_service::io::sync_reader::SyncReader;
//! use std::path::Path;
//!
//! let reader = SyncReader::new(Path::new("commands.csv")).unwrap();
//! for result in reader {
//!     match result {
//!         Ok(command) => println!("Processing command: {:?}", command),
//!         Err(e) => eprintln!("Error: {}", e),
//!     }
//! }
//! ```
//!
//! # Error Handling
//!
//! - Fatal errors (file not found, unreadable header) are returned from `new()`
//! - Individual row errors are yielded as `PointError::Parse` with the line number

use crate::io::csv_format::{convert_csv_record, CsvRecord};
use crate::types::{PointCommand, PointError};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::path::Path;

/// Synchronous CSV reader
///
/// Reads one row at a time; memory use does not grow with the file.
#[derive(Debug)]
pub struct SyncReader {
    reader: csv::Reader<File>,
    headers: StringRecord,
    record: StringRecord,
}

impl SyncReader {
    /// Open `path` and read its header row
    ///
    /// The CSV reader trims whitespace from all fields and accepts rows with
    /// a varying number of fields.
    pub fn new(path: &Path) -> Result<Self, PointError> {
        let file = File::open(path).map_err(|e| PointError::Io {
            message: format!("Failed to open file '{}': {}", path.display(), e),
        })?;

        let mut reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .buffer_capacity(8 * 1024)
            .from_reader(file);
        let headers = reader.headers()?.clone();

        Ok(Self {
            reader,
            headers,
            record: StringRecord::new(),
        })
    }
}

impl Iterator for SyncReader {
    type Item = Result<PointCommand, PointError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.reader.read_record(&mut self.record) {
            Ok(false) => None,
            Ok(true) => {
                let line = self.record.position().map(|pos| pos.line());
                let command = self
                    .record
                    .deserialize::<CsvRecord>(Some(&self.headers))
                    .map_err(|e| PointError::parse(line, e.to_string()))
                    .and_then(|csv_record| {
                        convert_csv_record(csv_record).map_err(|e| PointError::parse(line, e))
                    });
                Some(command)
            }
            Err(e) => Some(Err(e.into())),
        }
    }
}
