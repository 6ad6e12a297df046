//! Status and free-text filtering of display rows.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::reconcile::{DisplayRow, PaymentStatus, ReportError};

/// Which settlement states to keep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    /// Keep every row.
    #[default]
    All,
    /// Keep settled rows.
    Paid,
    /// Keep open rows.
    Open,
}

impl StatusFilter {
    fn accepts(self, status: PaymentStatus) -> bool {
        match self {
            Self::All => true,
            Self::Paid => status == PaymentStatus::Paid,
            Self::Open => status == PaymentStatus::Open,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "all" => Ok(Self::All),
            "paid" => Ok(Self::Paid),
            "open" => Ok(Self::Open),
            _ => Err(ReportError::UnknownStatusFilter(s.to_string())),
        }
    }
}

/// Table filter chosen by the consumer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowFilter {
    /// Settlement state.
    pub status: StatusFilter,
    /// Case-insensitive text matched against name, category, invoice
    /// number, project and description.
    pub search: Option<String>,
}

impl RowFilter {
    /// Whether `row` passes the filter.
    #[must_use]
    pub fn matches(&self, row: &DisplayRow) -> bool {
        if !self.status.accepts(row.status) {
            return false;
        }
        let Some(needle) = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
        else {
            return true;
        };
        let needle = needle.to_lowercase();
        [
            Some(row.name.as_str()),
            Some(row.category.as_str()),
            Some(row.invoice_number.as_str()),
            Some(row.project.as_str()),
            row.description.as_deref(),
        ]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&needle))
    }
}

/// Keeps the rows that pass `filter`, preserving order.
#[must_use]
pub fn filter_rows(rows: Vec<DisplayRow>, filter: &RowFilter) -> Vec<DisplayRow> {
    rows.into_iter().filter(|row| filter.matches(row)).collect()
}
