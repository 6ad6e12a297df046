//! Receivables.
//!
//! Receipts are independent of ledger movements. Their status is the one
//! field the dashboard writes back to the store.

pub mod status;
pub mod types;

pub use status::ReceiptStatus;
pub use types::Receipt;
