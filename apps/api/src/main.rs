mod config;
mod errors;
mod layout;
mod ledger;
mod models;
mod pdf;
mod report;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::ledger::{JsonlLedger, Ledger, MemoryLedger};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed values)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting census report service v{}", env!("CARGO_PKG_VERSION"));

    // Initialize ledger (file-backed when LEDGER_PATH is set)
    let ledger: Arc<dyn Ledger> = match &config.ledger_path {
        Some(path) => Arc::new(JsonlLedger::open(path, config.ledger_capacity).await?),
        None => Arc::new(MemoryLedger::new(config.ledger_capacity)),
    };
    info!(
        "Ledger initialized (backend: {}, rows: {}, capacity: {})",
        ledger.backend(),
        ledger.row_count().await?,
        config.ledger_capacity
    );

    let report_config = config.report_config();
    info!(
        "Report config: overflow policy {:?}",
        report_config.overflow_policy
    );

    // Build app state
    let state = AppState {
        ledger,
        report_config,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
