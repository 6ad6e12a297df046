//! Post-processing of reconciled display rows.
//!
//! The table consumer narrows, orders and totals the flat row list:
//! - Status and free-text filtering
//! - Stable sorting by a caller-chosen field
//! - Totals per status, category and month for the charts

pub mod filter;
pub mod sort;
pub mod summary;

pub use filter::{RowFilter, StatusFilter, filter_rows};
pub use sort::{SortDirection, SortField, sort_rows};
pub use summary::{ReportSummary, SummaryBucket, summarize};
