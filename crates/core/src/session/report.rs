//! Per-login report session.

use std::collections::HashMap;

use fluxo_shared::types::ReceiptId;

use super::state::ViewState;
use crate::receipts::{Receipt, ReceiptStatus};
use crate::reconcile::{DisplayRow, ViewKind};

/// Result lists owned by one logged-in session.
#[derive(Debug)]
pub struct ReportSession {
    views: HashMap<ViewKind, ViewState<DisplayRow>>,
    receipts: ViewState<Receipt>,
}

impl Default for ReportSession {
    fn default() -> Self {
        Self {
            views: ViewKind::ALL
                .into_iter()
                .map(|kind| (kind, ViewState::new()))
                .collect(),
            receipts: ViewState::new(),
        }
    }
}

impl ReportSession {
    /// Creates a session with an empty list per view.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// State of one view.
    #[must_use]
    pub fn view(&self, kind: ViewKind) -> &ViewState<DisplayRow> {
        &self.views[&kind]
    }

    /// State of the receipt list.
    #[must_use]
    pub const fn receipts(&self) -> &ViewState<Receipt> {
        &self.receipts
    }

    /// Reflects a stored status change in the receipt list.
    ///
    /// Returns the updated receipt, or `None` when the list does not hold it.
    pub fn apply_receipt_status(&self, id: ReceiptId, status: ReceiptStatus) -> Option<Receipt> {
        self.receipts
            .update_first(|receipt| receipt.id == id, |receipt| receipt.status = status)
    }
}
