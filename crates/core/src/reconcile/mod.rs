//! Cash-basis reconciliation.
//!
//! Turns raw ledger movements, purchase headers and purchase line items into
//! one flat, date-windowed list of display rows:
//! - Effective date per movement (payment, due or issue date)
//! - Authoritative window selection on that effective date
//! - Project, payment type and keyword filtering
//! - Header and line-item joins by invoice key
//! - Amount and display name resolution

pub mod effective;
pub mod error;
pub mod service;
pub mod types;
pub mod views;

#[cfg(test)]
mod props;
#[cfg(test)]
mod tests;

pub use effective::effective_date;
pub use error::ReportError;
pub use service::Reconciler;
pub use types::*;
pub use views::ViewKind;
