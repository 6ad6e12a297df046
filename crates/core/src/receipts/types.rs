//! Receipt record type.

use chrono::NaiveDate;
use fluxo_shared::types::{ProjectId, ReceiptId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::status::ReceiptStatus;

/// A receivable record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Receipt {
    /// Receipt ID.
    pub id: ReceiptId,
    /// Due date.
    pub due_date: Option<NaiveDate>,
    /// Document number.
    pub document_number: Option<String>,
    /// Amount receivable.
    pub value: Option<Decimal>,
    /// Current status.
    pub status: ReceiptStatus,
    /// Installment position, e.g. `1/3`.
    pub installment: Option<String>,
    /// Customer name.
    pub customer_name: Option<String>,
    /// Project reference.
    pub project_id: Option<ProjectId>,
}

impl Receipt {
    /// Amount, zero when unknown.
    #[must_use]
    pub fn amount(&self) -> Decimal {
        self.value.unwrap_or(Decimal::ZERO)
    }

    /// Status as shown on the dashboard: a pending receipt past its due date
    /// reads as late.
    #[must_use]
    pub fn display_status(&self, today: NaiveDate) -> ReceiptStatus {
        match (&self.status, self.due_date) {
            (ReceiptStatus::Pending, Some(due)) if due < today => ReceiptStatus::Late,
            (status, _) => status.clone(),
        }
    }
}
