//! Remote store access and report loading.
//!
//! This crate provides:
//! - The `RemoteStore` seam with REST and in-memory implementations
//! - The paginated fetcher
//! - Repositories for movements, invoices, lookups and receipts
//! - The report pipeline and receipt service that feed a session

pub mod pipeline;
pub mod receipts;
pub mod repositories;
pub mod store;

pub use pipeline::{PipelineError, Refresh, ReportPipeline, Stage};
pub use receipts::{ReceiptError, ReceiptService};
pub use store::{Fetcher, MemoryStore, RemoteStore, RestStore, StoreError};
