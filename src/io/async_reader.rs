//! Asynchronous CSV reader with batch interface
//!
//! Provides batch reading of point commands from any `futures` async reader.
//!
//! # Architecture
//!
//! ```text
//! CSV Reader → AsyncReader → Batches of PointCommands
//!                  ↓
//!           csv_format module
//!           (CsvRecord, convert_csv_record)
//! ```

use crate::io::csv_format::{convert_csv_record, CsvRecord};
use crate::types::{PointCommand, PointError};
use csv_async::AsyncReaderBuilder;
use futures::io::AsyncRead;
use futures::stream::StreamExt;
use tracing::warn;

/// Asynchronous CSV reader
///
/// Rows that fail to parse are logged and skipped; they never end a batch
/// early.
pub struct AsyncReader<R: AsyncRead + Unpin> {
    csv_reader: csv_async::AsyncDeserializer<R>,
    rows_read: u64,
    rows_skipped: usize,
}

impl<R: AsyncRead + Unpin + Send + 'static> AsyncReader<R> {
    /// Create a new AsyncReader from an async reader
    pub fn new(reader: R) -> Self {
        let csv_reader = AsyncReaderBuilder::new()
            .flexible(true)
            .trim(csv_async::Trim::All)
            .create_deserializer(reader);

        Self {
            csv_reader,
            rows_read: 0,
            rows_skipped: 0,
        }
    }

    /// Read up to `batch_size` commands
    ///
    /// Returns an empty vector once the input is exhausted.
    pub async fn read_batch(&mut self, batch_size: usize) -> Vec<PointCommand> {
        let mut batch = Vec::with_capacity(batch_size);
        let mut records = self.csv_reader.deserialize::<CsvRecord>();

        while batch.len() < batch_size {
            let Some(row) = records.next().await else {
                break;
            };
            self.rows_read += 1;
            // header is line 1
            let line = Some(self.rows_read + 1);

            let command = row
                .map_err(|e| PointError::parse(line, e.to_string()))
                .and_then(|csv_record| {
                    convert_csv_record(csv_record).map_err(|e| PointError::parse(line, e))
                });
            match command {
                Ok(command) => batch.push(command),
                Err(e) => {
                    warn!(error = %e, "skipping command row");
                    self.rows_skipped += 1;
                }
            }
        }

        batch
    }

    /// Number of rows skipped so far because they failed to parse
    pub fn rows_skipped(&self) -> usize {
        self.rows_skipped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CommandKind;
    use futures::io::Cursor;

    #[tokio::test]
    async fn test_async_reader_read_batch() {
        let csv_content = "type,user,amount\nseed,1,1000\ncharge,1,4000\nuse,2,1000\n";
        let mut async_reader = AsyncReader::new(Cursor::new(csv_content.as_bytes()));

        let batch = async_reader.read_batch(2).await;
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].kind, CommandKind::Seed);
        assert_eq!(batch[1].kind, CommandKind::Charge);
        assert_eq!(batch[1].amount, 4_000);

        let batch = async_reader.read_batch(2).await;
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].user_id, 2);
        assert_eq!(batch[0].kind, CommandKind::Use);

        assert!(async_reader.read_batch(2).await.is_empty());
    }

    #[tokio::test]
    async fn test_async_reader_empty_csv() {
        let mut async_reader = AsyncReader::new(Cursor::new("type,user,amount\n".as_bytes()));

        assert!(async_reader.read_batch(10).await.is_empty());
    }

    #[tokio::test]
    async fn test_async_reader_skips_invalid_rows() {
        let csv_content = "type,user,amount\nrefund,1,1000\ncharge,x,1000\ncharge,1,2000\n";
        let mut async_reader = AsyncReader::new(Cursor::new(csv_content.as_bytes()));

        let batch = async_reader.read_batch(10).await;

        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].amount, 2_000);
        assert_eq!(async_reader.rows_skipped(), 2);
    }

    #[tokio::test]
    async fn test_async_reader_whitespace_and_case() {
        let csv_content = "type,user,amount\n  Use  ,  3  ,  1500  \n";
        let mut async_reader = AsyncReader::new(Cursor::new(csv_content.as_bytes()));

        let batch = async_reader.read_batch(10).await;

        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].kind, CommandKind::Use);
        assert_eq!(batch[0].user_id, 3);
        assert_eq!(batch[0].amount, 1_500);
    }
}
