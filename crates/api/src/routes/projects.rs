//! Project lookup for the filter bar.

use axum::{Json, Router, extract::State, routing::get};
use fluxo_core::reconcile::Project;
use tracing::error;

use crate::AppState;
use crate::error::ApiError;

/// Creates the project routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/projects", get(list_projects))
}

/// GET /projects - Every project, by name.
async fn list_projects(State(state): State<AppState>) -> Result<Json<Vec<Project>>, ApiError> {
    let projects = state
        .pipeline
        .lookups()
        .all_projects()
        .await
        .inspect_err(|e| error!(error = %e, "Failed to list projects"))?;
    Ok(Json(projects))
}
