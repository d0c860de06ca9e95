pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::report::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Report API
        .route("/api/v1/reports", post(handlers::handle_render_report))
        .route("/api/v1/submissions", post(handlers::handle_submit))
        .route(
            "/api/v1/ledger/columns",
            get(handlers::handle_ledger_columns),
        )
        .with_state(state)
}
