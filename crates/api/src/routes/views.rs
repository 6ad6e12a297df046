//! Report view routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use chrono::NaiveDate;
use fluxo_core::reconcile::{DisplayRow, ViewKind};
use fluxo_core::rows::{
    ReportSummary, RowFilter, SortDirection, SortField, StatusFilter, filter_rows, sort_rows,
    summarize,
};
use fluxo_core::session::{Generation, ViewSnapshot};
use fluxo_db::Refresh;
use fluxo_shared::AppError;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use super::params::{parse_project, window_or_current_month};
use crate::AppState;
use crate::error::ApiError;
use crate::middleware::CurrentSession;

/// Creates the view routes (requires the session middleware).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/views/{view}", get(get_view))
        .route("/views/{view}/state", get(get_view_state))
}

// ============================================================================
// Query Parameters
// ============================================================================

/// Query parameters for a view refresh.
#[derive(Debug, Default, Deserialize)]
pub struct ViewQuery {
    /// Window start (defaults to the first day of the current month).
    pub start: Option<NaiveDate>,
    /// Window end (defaults to the last day of the current month).
    pub end: Option<NaiveDate>,
    /// Project ID, blank for all.
    pub project: Option<String>,
    /// `all`, `paid` or `open`.
    pub status: Option<String>,
    /// Free-text search.
    pub q: Option<String>,
    /// Sort field.
    pub sort: Option<String>,
    /// `asc` or `desc`.
    pub dir: Option<String>,
    /// Restrict to one invoice.
    pub invoice_key: Option<String>,
}

// ============================================================================
// Response Types
// ============================================================================

/// Response for a view refresh.
#[derive(Debug, Serialize)]
pub struct ViewResponse {
    /// View slug.
    pub view: ViewKind,
    /// Generation that produced the rows.
    pub generation: Generation,
    /// Filtered and sorted rows.
    pub rows: Vec<DisplayRow>,
    /// Totals over `rows`.
    pub summary: ReportSummary,
}

/// Response for a view state read.
#[derive(Debug, Serialize)]
pub struct ViewStateResponse {
    /// View slug.
    pub view: ViewKind,
    /// Session state of the view.
    #[serde(flatten)]
    pub state: ViewSnapshot<DisplayRow>,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /views/{view} - Refresh a view and return the table rows.
///
/// The session keeps the unfiltered reconciliation. Status, search and sort
/// only shape this response.
async fn get_view(
    State(state): State<AppState>,
    Path(view): Path<String>,
    Query(query): Query<ViewQuery>,
    current: CurrentSession,
) -> Result<Json<ViewResponse>, ApiError> {
    let view: ViewKind = view.parse()?;
    let window = window_or_current_month(query.start, query.end)?;
    let project = parse_project(query.project.as_deref())?;
    let status: StatusFilter = query.status.as_deref().unwrap_or_default().parse()?;
    let sort: SortField = query.sort.as_deref().unwrap_or("date").parse()?;
    let direction: SortDirection = query.dir.as_deref().unwrap_or("asc").parse()?;

    let keywords = state.config.view_keywords(view.slug());
    let options = view
        .options(window)
        .with_project(project)
        .with_keywords(&keywords.include, &keywords.exclude)
        .with_invoice_key(query.invoice_key);

    let refresh = state
        .pipeline
        .refresh_view(&current.session, view, &options)
        .await
        .inspect_err(|e| error!(view = %view, error = %e, "View refresh failed"))?;

    match refresh {
        Refresh::Superseded { generation } => Err(ApiError(AppError::Superseded(format!(
            "{view} refresh {generation} was replaced by a newer request"
        )))),
        Refresh::Applied { generation, rows } => {
            let filter = RowFilter {
                status,
                search: query.q,
            };
            let mut rows = filter_rows(rows, &filter);
            sort_rows(&mut rows, sort, direction);
            let summary = summarize(&rows);
            info!(view = %view, generation = %generation, rows = rows.len(), "View served");

            Ok(Json(ViewResponse {
                view,
                generation,
                rows,
                summary,
            }))
        }
    }
}

/// GET /views/{view}/state - Current session state of a view.
async fn get_view_state(
    Path(view): Path<String>,
    current: CurrentSession,
) -> Result<Json<ViewStateResponse>, ApiError> {
    let view: ViewKind = view.parse()?;
    Ok(Json(ViewStateResponse {
        view,
        state: current.session.view(view).snapshot(),
    }))
}
