//! Ledger: the append-only tabular store that receives one flattened row per
//! business record.
//!
//! `AppState` holds an `Arc<dyn Ledger>`: `JsonlLedger` when `LEDGER_PATH` is set,
//! `MemoryLedger` otherwise.

pub mod flatten;
pub mod jsonl;
pub mod memory;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::LedgerError;

pub use flatten::{flatten_submission, LedgerRow, LEDGER_HEADERS};
pub use jsonl::JsonlLedger;
pub use memory::MemoryLedger;

/// Default row capacity of a ledger sheet.
pub const DEFAULT_CAPACITY: usize = 1000;

/// Result of a successful append.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerReceipt {
    pub rows_appended: usize,
    /// Data rows in the ledger after the append, header excluded.
    pub total_rows: usize,
}

/// Append-only row sink. A batch is appended whole or not at all.
#[async_trait]
pub trait Ledger: Send + Sync {
    async fn append_rows(&self, rows: &[LedgerRow]) -> Result<LedgerReceipt, LedgerError>;

    /// Current number of data rows, header excluded.
    async fn row_count(&self) -> Result<usize, LedgerError>;

    /// Short backend name for logs ("memory" | "jsonl").
    fn backend(&self) -> &'static str;
}

/// Logs when `total_rows` is past 90% of `capacity`, or past capacity.
pub(crate) fn warn_near_capacity(backend: &str, total_rows: usize, capacity: usize) {
    if total_rows > capacity {
        warn!(
            backend,
            total_rows, capacity, "ledger is over capacity, archive or start a new sheet"
        );
    } else if total_rows * 10 > capacity * 9 {
        warn!(backend, total_rows, capacity, "ledger is nearly full");
    }
}
