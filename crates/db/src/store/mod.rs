//! Remote tabular store access.
//!
//! The store is a REST-fronted table service that caps every read at a fixed
//! number of rows. [`RemoteStore`] is the seam: [`RestStore`] speaks the
//! PostgREST dialect over HTTP, [`MemoryStore`] evaluates the same filter
//! algebra in process.

pub mod error;
pub mod memory;
pub mod paginate;
pub mod query;
pub mod rest;


use async_trait::async_trait;
use fluxo_shared::RowRange;
use serde_json::Value;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use paginate::{Fetcher, fetch_all, fetch_all_as};
pub use query::{Filter, Order, Query};
pub use rest::RestStore;

/// One page of a ranged read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    /// Rows in store order.
    pub rows: Vec<Value>,
    /// Total rows matching the query, when the store reports it.
    pub total: Option<u64>,
}

impl Page {
    /// Page without a reported total.
    #[must_use]
    pub const fn new(rows: Vec<Value>) -> Self {
        Self { rows, total: None }
    }

    /// Page with a reported total.
    #[must_use]
    pub const fn with_total(rows: Vec<Value>, total: u64) -> Self {
        Self {
            rows,
            total: Some(total),
        }
    }
}

/// Primitives of the remote store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Reads the rows of `query` inside `range`.
    async fn select(&self, query: &Query, range: RowRange) -> Result<Page, StoreError>;

    /// Updates the single row of `table` whose `key_column` equals `key`.
    ///
    /// Fails with [`StoreError::NotFound`] when no row matches.
    async fn update(
        &self,
        table: &str,
        key_column: &str,
        key: &Value,
        patch: &Value,
    ) -> Result<(), StoreError>;
}
