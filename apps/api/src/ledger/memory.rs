//! In-process ledger: a header row plus appended value rows behind a mutex.

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::errors::LedgerError;
use crate::ledger::{warn_near_capacity, Ledger, LedgerReceipt, LedgerRow, LEDGER_HEADERS};

pub struct MemoryLedger {
    /// `sheet[0]` is the header row.
    sheet: Mutex<Vec<Vec<Value>>>,
    capacity: usize,
}

impl MemoryLedger {
    pub fn new(capacity: usize) -> Self {
        let header = LEDGER_HEADERS.iter().map(|h| Value::from(*h)).collect();
        Self {
            sheet: Mutex::new(vec![header]),
            capacity,
        }
    }

    /// Copy of every row including the header.
    #[cfg(test)]
    pub async fn snapshot(&self) -> Vec<Vec<Value>> {
        self.sheet.lock().await.clone()
    }
}

#[async_trait]
impl Ledger for MemoryLedger {
    async fn append_rows(&self, rows: &[LedgerRow]) -> Result<LedgerReceipt, LedgerError> {
        if rows.is_empty() {
            return Err(LedgerError::NothingToAppend);
        }

        let mut sheet = self.sheet.lock().await;
        sheet.extend(rows.iter().map(LedgerRow::values));
        let total_rows = sheet.len() - 1;
        warn_near_capacity(self.backend(), total_rows, self.capacity);

        Ok(LedgerReceipt {
            rows_appended: rows.len(),
            total_rows,
        })
    }

    async fn row_count(&self) -> Result<usize, LedgerError> {
        Ok(self.sheet.lock().await.len() - 1)
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
