//! File-backed ledger: one JSON array per line, the first line being the header.
//!
//! The file is only ever appended to. A batch is serialised up front and written
//! with a single `write_all`, so a serialisation failure appends nothing. A write
//! that fails partway is truncated back to the previous length.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::errors::LedgerError;
use crate::ledger::{warn_near_capacity, Ledger, LedgerReceipt, LedgerRow, LEDGER_HEADERS};

pub struct JsonlLedger {
    path: PathBuf,
    capacity: usize,
    /// Data rows in the file; the lock also serialises appends.
    rows: Mutex<usize>,
}

impl JsonlLedger {
    /// Opens `path`, creating it if needed. A missing or empty file gets the header line.
    pub async fn open(path: impl AsRef<Path>, capacity: usize) -> Result<Self, LedgerError> {
        let path = path.as_ref().to_path_buf();
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;

        let rows = match count_lines(&path).await? {
            0 => {
                let mut line = serde_json::to_vec(&LEDGER_HEADERS)?;
                line.push(b'\n');
                file.write_all(&line).await?;
                file.flush().await?;
                info!(path = %path.display(), "wrote ledger header");
                0
            }
            lines => lines - 1,
        };

        Ok(Self {
            path,
            capacity,
            rows: Mutex::new(rows),
        })
    }
}

async fn write_batch(file: &mut File, buffer: &[u8]) -> std::io::Result<()> {
    file.write_all(buffer).await?;
    file.flush().await
}

async fn count_lines(path: &Path) -> Result<usize, LedgerError> {
    let mut lines = BufReader::new(File::open(path).await?).lines();
    let mut count = 0;
    while let Some(line) = lines.next_line().await? {
        if !line.trim().is_empty() {
            count += 1;
        }
    }
    Ok(count)
}

#[async_trait]
impl Ledger for JsonlLedger {
    async fn append_rows(&self, rows: &[LedgerRow]) -> Result<LedgerReceipt, LedgerError> {
        if rows.is_empty() {
            return Err(LedgerError::NothingToAppend);
        }

        let mut buffer = Vec::new();
        for row in rows {
            serde_json::to_writer(&mut buffer, &row.values())?;
            buffer.push(b'\n');
        }

        let mut count = self.rows.lock().await;
        let mut file = OpenOptions::new().append(true).open(&self.path).await?;
        let original_len = file.metadata().await?.len();
        if let Err(err) = write_batch(&mut file, &buffer).await {
            warn!(path = %self.path.display(), error = %err, "ledger append failed, truncating");
            file.set_len(original_len).await?;
            return Err(err.into());
        }

        *count += rows.len();
        warn_near_capacity(self.backend(), *count, self.capacity);

        Ok(LedgerReceipt {
            rows_appended: rows.len(),
            total_rows: *count,
        })
    }

    async fn row_count(&self) -> Result<usize, LedgerError> {
        Ok(*self.rows.lock().await)
    }

    fn backend(&self) -> &'static str {
        "jsonl"
    }
}
