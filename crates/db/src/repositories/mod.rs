//! Repository abstractions for data access.
//!
//! Repositories turn report parameters into store queries and decode the
//! rows, hiding the REST dialect from the rest of the application. Every
//! read goes through the paginated fetcher.

pub mod invoice;
pub mod lookup;
pub mod movement;
pub mod receipt;

pub use invoice::{InvoiceRepository, LineItemRepository};
pub use lookup::LookupRepository;
pub use movement::MovementRepository;
pub use receipt::ReceiptRepository;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::store::{Fetcher, Filter, Query, StoreError};

/// Reads rows of `table` whose `column` is in `keys`, at most `chunk_size`
/// keys per request. Each chunk is itself paginated.
pub(crate) async fn fetch_by_keys<T: DeserializeOwned>(
    fetcher: &Fetcher,
    table: &str,
    column: &str,
    keys: &[Value],
    chunk_size: usize,
    order_by: &[&str],
) -> Result<Vec<T>, StoreError> {
    if keys.is_empty() {
        return Ok(Vec::new());
    }
    if chunk_size == 0 {
        return Err(StoreError::InvalidRequest(
            "lookup chunk size must be positive".to_string(),
        ));
    }

    let mut rows = Vec::new();
    for chunk in keys.chunks(chunk_size) {
        let query = order_by.iter().fold(
            Query::table(table).filter(Filter::In(column.to_string(), chunk.to_vec())),
            |query, column| query.order_asc(*column),
        );
        rows.extend(fetcher.all::<T>(&query).await?);
    }
    debug!(table, keys = keys.len(), rows = rows.len(), "Fetched by keys");
    Ok(rows)
}
