//! Receipt list refresh and status mutation.

use fluxo_core::receipts::{Receipt, ReceiptStatus};
use fluxo_core::session::{Publish, ReportSession};
use fluxo_shared::DateWindow;
use fluxo_shared::types::{ProjectId, ReceiptId};
use thiserror::Error;
use tracing::{error, warn};

use crate::pipeline::Refresh;
use crate::repositories::ReceiptRepository;
use crate::store::StoreError;

/// Receipt operation errors.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// The new status is empty.
    #[error("Receipt status must not be blank")]
    BlankStatus,

    /// No receipt has this ID.
    #[error("Receipt {0} not found")]
    NotFound(ReceiptId),

    /// The store rejected the read or write.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Receipt operations against the store and a session's receipt list.
#[derive(Debug, Clone)]
pub struct ReceiptService {
    repository: ReceiptRepository,
}

impl ReceiptService {
    /// Creates a new receipt service.
    pub const fn new(repository: ReceiptRepository) -> Self {
        Self { repository }
    }

    /// Reloads the session's receipt list for `window`.
    ///
    /// # Errors
    ///
    /// Returns the store error. It is recorded on the list when this refresh
    /// is still the newest.
    pub async fn refresh(
        &self,
        session: &ReportSession,
        window: &DateWindow,
        project: Option<ProjectId>,
    ) -> Result<Refresh<Receipt>, ReceiptError> {
        let state = session.receipts();
        let generation = state.begin();

        match self.repository.in_window(window, project).await {
            Ok(rows) => match state.publish(generation, Ok(rows.clone())) {
                Publish::Applied => Ok(Refresh::Applied { generation, rows }),
                Publish::Stale => {
                    warn!(generation = %generation, "Discarding superseded receipt list");
                    Ok(Refresh::Superseded { generation })
                }
            },
            Err(e) => {
                error!(error = %e, "Failed to fetch receipts");
                state.publish(generation, Err(e.to_string()));
                Err(e.into())
            }
        }
    }

    /// Writes `status` to receipt `id`, then mirrors it in the session list.
    ///
    /// Returns the updated list entry, or `None` when the list does not hold
    /// the receipt. On failure the list is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`ReceiptError::BlankStatus`], [`ReceiptError::NotFound`] when
    /// the store holds no such receipt, or the store error.
    pub async fn set_status(
        &self,
        session: &ReportSession,
        id: ReceiptId,
        status: ReceiptStatus,
    ) -> Result<Option<Receipt>, ReceiptError> {
        if status.as_str().trim().is_empty() {
            return Err(ReceiptError::BlankStatus);
        }

        match self.repository.update_status(id, &status).await {
            Ok(()) => {}
            Err(StoreError::NotFound { .. }) => {
                warn!(receipt_id = %id, "Status update for unknown receipt");
                return Err(ReceiptError::NotFound(id));
            }
            Err(e) => {
                error!(receipt_id = %id, error = %e, "Failed to update receipt status");
                return Err(e.into());
            }
        }
        Ok(session.apply_receipt_status(id, status))
    }
}
