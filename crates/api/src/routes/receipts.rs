//! Receipt routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, patch},
};
use chrono::{Local, NaiveDate};
use fluxo_core::receipts::{Receipt, ReceiptStatus};
use fluxo_core::session::Generation;
use fluxo_db::Refresh;
use fluxo_shared::AppError;
use fluxo_shared::types::ReceiptId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::params::{parse_project, window_or_current_month};
use crate::AppState;
use crate::error::ApiError;
use crate::middleware::CurrentSession;

/// Creates the receipt routes (requires the session middleware).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/receipts", get(list_receipts))
        .route("/receipts/{id}/status", patch(update_status))
}

// ============================================================================
// Request / Response Types
// ============================================================================

/// Query parameters for the receipt list.
#[derive(Debug, Default, Deserialize)]
pub struct ReceiptsQuery {
    /// Window start.
    pub start: Option<NaiveDate>,
    /// Window end.
    pub end: Option<NaiveDate>,
    /// Project ID, blank for all.
    pub project: Option<String>,
}

/// Body of a status update.
#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    /// New status text.
    pub status: String,
}

/// A receipt with its dashboard status.
#[derive(Debug, Serialize)]
pub struct ReceiptRow {
    /// Stored record.
    #[serde(flatten)]
    pub receipt: Receipt,
    /// Status with overdue pending receipts shown as late.
    pub display_status: ReceiptStatus,
}

/// Response for the receipt list.
#[derive(Debug, Serialize)]
pub struct ReceiptsResponse {
    /// Generation that produced the list.
    pub generation: Generation,
    /// Receipts by due date.
    pub receipts: Vec<ReceiptRow>,
    /// Sum of the listed amounts.
    pub total: Decimal,
}

/// Response for a status update.
#[derive(Debug, Serialize)]
pub struct StatusUpdateResponse {
    /// Receipt ID.
    pub id: ReceiptId,
    /// Stored status.
    pub status: ReceiptStatus,
    /// Updated session entry, when the session list holds the receipt.
    pub receipt: Option<Receipt>,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /receipts - Reload the session's receipt list.
async fn list_receipts(
    State(state): State<AppState>,
    Query(query): Query<ReceiptsQuery>,
    current: CurrentSession,
) -> Result<Json<ReceiptsResponse>, ApiError> {
    let window = window_or_current_month(query.start, query.end)?;
    let project = parse_project(query.project.as_deref())?;

    match state
        .receipts
        .refresh(&current.session, &window, project)
        .await?
    {
        Refresh::Superseded { generation } => Err(ApiError(AppError::Superseded(format!(
            "receipts refresh {generation} was replaced by a newer request"
        )))),
        Refresh::Applied { generation, rows } => {
            let today = Local::now().date_naive();
            let total = rows.iter().map(Receipt::amount).sum();
            let receipts = rows
                .into_iter()
                .map(|receipt| ReceiptRow {
                    display_status: receipt.display_status(today),
                    receipt,
                })
                .collect();
            Ok(Json(ReceiptsResponse {
                generation,
                receipts,
                total,
            }))
        }
    }
}

/// PATCH /receipts/{id}/status - Write a new status.
async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    current: CurrentSession,
    Json(payload): Json<StatusUpdateRequest>,
) -> Result<Json<StatusUpdateResponse>, ApiError> {
    let id = ReceiptId::new(id);
    let status = ReceiptStatus::from(payload.status);

    let receipt = state
        .receipts
        .set_status(&current.session, id, status.clone())
        .await?;

    Ok(Json(StatusUpdateResponse {
        id,
        status,
        receipt,
    }))
}
