//! Axum route handlers for the Report API.

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Local;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::layout::{render, RenderedReport, ReportConfig};
use crate::ledger::{flatten_submission, LEDGER_HEADERS};
use crate::models::census::{validate_submission, Submission};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct SubmissionResponse {
    pub submission_id: Uuid,
    pub rows_appended: usize,
    pub page_count: usize,
    pub file_name: String,
}

#[derive(Debug, Serialize)]
pub struct LedgerColumnsResponse {
    pub columns: Vec<&'static str>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/reports
///
/// Validates the submission and returns the rendered PDF as an attachment.
pub async fn handle_render_report(
    State(state): State<AppState>,
    Json(submission): Json<Submission>,
) -> Result<Response, AppError> {
    validate_submission(&submission)?;

    let file_name = submission.report_file_name();
    let report = render_blocking(submission, state.report_config.clone()).await?;
    info!(
        pages = report.page_count,
        rows = report.row_count,
        file_name = %file_name,
        "report served"
    );

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, content_disposition(&file_name)),
        ],
        report.bytes,
    )
        .into_response())
}

/// POST /api/v1/submissions
///
/// Validates, renders, then appends one ledger row per business.
/// The render runs first so a submission that cannot be printed is never recorded.
pub async fn handle_submit(
    State(state): State<AppState>,
    Json(submission): Json<Submission>,
) -> Result<Json<SubmissionResponse>, AppError> {
    validate_submission(&submission)?;

    let submission_id = Uuid::new_v4();
    let file_name = submission.report_file_name();
    let rows = flatten_submission(
        &submission.location,
        &submission.summary,
        &submission.businesses,
        Local::now().naive_local(),
    );

    let report = render_blocking(submission, state.report_config.clone()).await?;

    // A submission without businesses has nothing to record.
    let rows_appended = if rows.is_empty() {
        0
    } else {
        state.ledger.append_rows(&rows).await?.rows_appended
    };

    info!(
        %submission_id,
        rows_appended,
        pages = report.page_count,
        ledger = state.ledger.backend(),
        "submission recorded"
    );

    Ok(Json(SubmissionResponse {
        submission_id,
        rows_appended,
        page_count: report.page_count,
        file_name,
    }))
}

/// GET /api/v1/ledger/columns
pub async fn handle_ledger_columns() -> Json<LedgerColumnsResponse> {
    Json(LedgerColumnsResponse {
        columns: LEDGER_HEADERS.to_vec(),
    })
}

/// RFC 5987 `attr-char` stays literal; everything else is percent-encoded.
const FILENAME_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'!')
    .remove(b'#')
    .remove(b'$')
    .remove(b'&')
    .remove(b'+')
    .remove(b'-')
    .remove(b'.')
    .remove(b'^')
    .remove(b'_')
    .remove(b'`')
    .remove(b'|')
    .remove(b'~');

/// Attachment header for a user-derived file name: an ASCII-only quoted `filename`
/// fallback plus the exact name as `filename*`.
fn content_disposition(file_name: &str) -> String {
    let fallback: String = file_name
        .chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            ' '..='~' => c,
            _ => '_',
        })
        .collect();
    format!(
        "attachment; filename=\"{fallback}\"; filename*=UTF-8''{}",
        utf8_percent_encode(file_name, FILENAME_ENCODE_SET)
    )
}

/// Layout is CPU-bound; keep it off the async executor.
async fn render_blocking(
    submission: Submission,
    config: ReportConfig,
) -> Result<RenderedReport, AppError> {
    let report = tokio::task::spawn_blocking(move || {
        render(
            &submission.location,
            &submission.summary,
            &submission.businesses,
            &config,
        )
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in render: {e}")))??;
    Ok(report)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
