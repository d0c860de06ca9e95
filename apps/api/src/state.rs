use std::sync::Arc;

use crate::layout::ReportConfig;
use crate::ledger::Ledger;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Ledger sink. Default: MemoryLedger. JsonlLedger when LEDGER_PATH is set.
    pub ledger: Arc<dyn Ledger>,
    /// Titles and overflow policy for every render; the engine never reads the environment.
    pub report_config: ReportConfig,
}
