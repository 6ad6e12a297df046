//! Core business logic for Fluxo.
//!
//! This crate contains pure business logic with ZERO web or store dependencies.
//! Record types, the cash-basis reconciliation, row post-processing and the
//! session-owned result lists live here.
//!
//! # Modules
//!
//! - `reconcile` - Effective dates, window selection and invoice joins
//! - `rows` - Filtering, sorting and summarising display rows
//! - `receipts` - Receivable records and their status
//! - `session` - Generation-guarded result lists per logged-in session

pub mod receipts;
pub mod reconcile;
pub mod rows;
pub mod session;
