//! Ledger movement reads.

use fluxo_core::reconcile::Movement;
use fluxo_shared::DateWindow;
use fluxo_shared::types::ProjectId;
use tracing::info;

use crate::store::{Fetcher, Filter, Query, StoreError};

/// Date columns an effective date can come from.
pub const DATE_COLUMNS: [&str; 3] = ["payment_date", "due_date", "issue_date"];

/// Movement repository.
#[derive(Debug, Clone)]
pub struct MovementRepository {
    fetcher: Fetcher,
    table: String,
}

impl MovementRepository {
    /// Creates a new movement repository.
    pub fn new(fetcher: Fetcher, table: impl Into<String>) -> Self {
        Self {
            fetcher,
            table: table.into(),
        }
    }

    /// Superset pre-filter for `window`.
    ///
    /// A movement whose effective date falls in the window has at least one
    /// date column in the window, so OR-ing one range group per column never
    /// drops a row the reconciler would keep. The reconciler re-applies the
    /// exact window.
    pub fn window_query(&self, window: &DateWindow, project: Option<ProjectId>) -> Query {
        let start = window.start().to_string();
        let end = window.end().to_string();
        let groups = DATE_COLUMNS
            .iter()
            .map(|column| Filter::between(column, start.as_str(), end.as_str()))
            .collect();

        let mut query = Query::table(&self.table).filter(Filter::Or(groups));
        if let Some(project) = project {
            query = query.filter(Filter::eq("project_id", project.into_inner()));
        }
        query.order_asc("id")
    }

    /// Fetches every movement that may fall in `window`.
    ///
    /// # Errors
    ///
    /// Returns an error if any page fails or a row cannot be decoded.
    pub async fn in_window(
        &self,
        window: &DateWindow,
        project: Option<ProjectId>,
    ) -> Result<Vec<Movement>, StoreError> {
        let movements: Vec<Movement> = self
            .fetcher
            .all(&self.window_query(window, project))
            .await?;
        info!(
            start = %window.start(),
            end = %window.end(),
            project = ?project,
            count = movements.len(),
            "Fetched movements"
        );
        Ok(movements)
    }
}
