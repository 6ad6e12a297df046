//! Purchase invoice header and line item reads.

use fluxo_core::reconcile::{Invoice, LineItem};
use serde_json::Value;

use super::fetch_by_keys;
use crate::store::{Fetcher, StoreError};

fn key_values(keys: &[String]) -> Vec<Value> {
    keys.iter().cloned().map(Value::String).collect()
}

/// Invoice header repository.
#[derive(Debug, Clone)]
pub struct InvoiceRepository {
    fetcher: Fetcher,
    table: String,
    chunk_size: usize,
}

impl InvoiceRepository {
    /// Creates a new invoice repository.
    pub fn new(fetcher: Fetcher, table: impl Into<String>, chunk_size: usize) -> Self {
        Self {
            fetcher,
            table: table.into(),
            chunk_size,
        }
    }

    /// Fetches the headers of the given invoice keys.
    ///
    /// # Errors
    ///
    /// Returns an error if any request fails.
    pub async fn by_keys(&self, keys: &[String]) -> Result<Vec<Invoice>, StoreError> {
        fetch_by_keys(
            &self.fetcher,
            &self.table,
            "invoice_key",
            &key_values(keys),
            self.chunk_size,
            &["invoice_key"],
        )
        .await
    }
}

/// Invoice line item repository.
#[derive(Debug, Clone)]
pub struct LineItemRepository {
    fetcher: Fetcher,
    table: String,
    chunk_size: usize,
}

impl LineItemRepository {
    /// Creates a new line item repository.
    pub fn new(fetcher: Fetcher, table: impl Into<String>, chunk_size: usize) -> Self {
        Self {
            fetcher,
            table: table.into(),
            chunk_size,
        }
    }

    /// Fetches the line items of the given invoice keys.
    ///
    /// # Errors
    ///
    /// Returns an error if any request fails.
    pub async fn by_keys(&self, keys: &[String]) -> Result<Vec<LineItem>, StoreError> {
        fetch_by_keys(
            &self.fetcher,
            &self.table,
            "invoice_key",
            &key_values(keys),
            self.chunk_size,
            &["invoice_key", "sequence"],
        )
        .await
    }
}
