//! Report error types.

use chrono::NaiveDate;
use fluxo_shared::types::InvalidWindow;
use thiserror::Error;

/// Errors that can occur while preparing a report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Invalid date range.
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange {
        /// Start date.
        start: NaiveDate,
        /// End date.
        end: NaiveDate,
    },

    /// View slug not recognised.
    #[error("Unknown view: {0}")]
    UnknownView(String),

    /// Status filter not recognised.
    #[error("Unknown status filter: {0}")]
    UnknownStatusFilter(String),

    /// Sort field not recognised.
    #[error("Unknown sort field: {0}")]
    UnknownSortField(String),

    /// Sort direction not recognised.
    #[error("Unknown sort direction: {0}")]
    UnknownSortDirection(String),
}

impl From<InvalidWindow> for ReportError {
    fn from(err: InvalidWindow) -> Self {
        Self::InvalidDateRange {
            start: err.start,
            end: err.end,
        }
    }
}
