//! Draining a capped result set page by page.

use std::sync::Arc;

use fluxo_shared::RowRange;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error};

use super::{Query, RemoteStore, StoreError};

/// Reads every row of `query`, `page_size` rows per request.
///
/// Pages are requested strictly in sequence and concatenated in request
/// order. Fetching stops at the first page shorter than `page_size`, or once
/// the rows collected reach the total the store reported. A failed page
/// aborts the whole fetch.
///
/// # Errors
///
/// Returns the first page error, or [`StoreError::InvalidRequest`] for a
/// zero page size.
pub async fn fetch_all(
    store: &dyn RemoteStore,
    query: &Query,
    page_size: u64,
) -> Result<Vec<Value>, StoreError> {
    if page_size == 0 {
        return Err(StoreError::InvalidRequest(
            "page size must be positive".to_string(),
        ));
    }

    let mut rows = Vec::new();
    let mut page_index = 0;
    loop {
        let range = RowRange::page(page_index, page_size);
        let page = store.select(query, range).await.map_err(|e| {
            error!(table = %query.table, page = page_index, error = %e, "Page fetch failed");
            e
        })?;

        let received = page.rows.len() as u64;
        rows.extend(page.rows);
        debug!(
            table = %query.table,
            page = page_index,
            received,
            total = ?page.total,
            "Fetched page"
        );

        if received < page_size {
            break;
        }
        if page.total.is_some_and(|total| rows.len() as u64 >= total) {
            break;
        }
        page_index += 1;
    }

    Ok(rows)
}

/// [`fetch_all`], decoding each row into `T`.
///
/// # Errors
///
/// Returns the fetch error or [`StoreError::Decode`] for the first row that
/// does not fit `T`.
pub async fn fetch_all_as<T: DeserializeOwned>(
    store: &dyn RemoteStore,
    query: &Query,
    page_size: u64,
) -> Result<Vec<T>, StoreError> {
    fetch_all(store, query, page_size)
        .await?
        .into_iter()
        .map(|row| serde_json::from_value(row).map_err(|e| StoreError::decode(&query.table, e)))
        .collect()
}

/// A store handle bundled with its page size.
#[derive(Clone)]
pub struct Fetcher {
    store: Arc<dyn RemoteStore>,
    page_size: u64,
}

impl Fetcher {
    /// Creates a fetcher over `store`.
    pub fn new(store: Arc<dyn RemoteStore>, page_size: u64) -> Self {
        Self { store, page_size }
    }

    /// The underlying store.
    pub fn store(&self) -> &dyn RemoteStore {
        self.store.as_ref()
    }

    /// See [`fetch_all_as`].
    ///
    /// # Errors
    ///
    /// Propagates fetch and decode errors.
    pub async fn all<T: DeserializeOwned>(&self, query: &Query) -> Result<Vec<T>, StoreError> {
        fetch_all_as(self.store.as_ref(), query, self.page_size).await
    }
}

impl std::fmt::Debug for Fetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fetcher")
            .field("page_size", &self.page_size)
            .finish_non_exhaustive()
    }
}
