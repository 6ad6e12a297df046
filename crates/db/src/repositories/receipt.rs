//! Receivable reads and the status write.

use fluxo_core::receipts::{Receipt, ReceiptStatus};
use fluxo_shared::DateWindow;
use fluxo_shared::types::{ProjectId, ReceiptId};
use serde_json::{Value, json};
use tracing::info;

use crate::store::{Fetcher, Filter, Query, StoreError};

/// Receipt repository.
#[derive(Debug, Clone)]
pub struct ReceiptRepository {
    fetcher: Fetcher,
    table: String,
}

impl ReceiptRepository {
    /// Creates a new receipt repository.
    pub fn new(fetcher: Fetcher, table: impl Into<String>) -> Self {
        Self {
            fetcher,
            table: table.into(),
        }
    }

    /// Receipts due inside `window`, by due date.
    pub fn window_query(&self, window: &DateWindow, project: Option<ProjectId>) -> Query {
        let mut query = Query::table(&self.table).filter(Filter::between(
            "due_date",
            window.start().to_string(),
            window.end().to_string(),
        ));
        if let Some(project) = project {
            query = query.filter(Filter::eq("project_id", project.into_inner()));
        }
        query.order_asc("due_date").order_asc("id")
    }

    /// Fetches receipts due inside `window`.
    ///
    /// # Errors
    ///
    /// Returns an error if any page fails or a row cannot be decoded.
    pub async fn in_window(
        &self,
        window: &DateWindow,
        project: Option<ProjectId>,
    ) -> Result<Vec<Receipt>, StoreError> {
        self.fetcher.all(&self.window_query(window, project)).await
    }

    /// Writes a new status to one receipt.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when no receipt has `id`, otherwise
    /// the store error unchanged. Nothing is retried.
    pub async fn update_status(
        &self,
        id: ReceiptId,
        status: &ReceiptStatus,
    ) -> Result<(), StoreError> {
        self.fetcher
            .store()
            .update(
                &self.table,
                "id",
                &Value::from(id.into_inner()),
                &json!({ "status": status.as_str() }),
            )
            .await?;
        info!(receipt_id = %id, status = %status, "Receipt status updated");
        Ok(())
    }
}
