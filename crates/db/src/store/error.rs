//! Remote store errors.

use thiserror::Error;

/// Error returned by a [`RemoteStore`](super::RemoteStore) call.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The request never produced a response.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The store answered with a non-success status.
    #[error("Store returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, as returned.
        body: String,
    },

    /// A row could not be decoded into the expected record type.
    #[error("Failed to decode {table} row: {source}")]
    Decode {
        /// Table the row came from.
        table: String,
        /// Underlying decode error.
        #[source]
        source: serde_json::Error,
    },

    /// An update matched no row.
    #[error("No {table} row with {key}")]
    NotFound {
        /// Table that was updated.
        table: String,
        /// Key filter, as `column=value`.
        key: String,
    },

    /// The query cannot be expressed (unknown table, bad page size, ...).
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl StoreError {
    /// Builds a decode error for `table`.
    pub fn decode(table: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Decode {
            table: table.into(),
            source,
        }
    }
}
