//! Row ranges for range-paginated reads.

use serde::{Deserialize, Serialize};

/// An inclusive, zero-based row range `[from, to]` on a stable ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowRange {
    /// First row offset.
    pub from: u64,
    /// Last row offset (inclusive).
    pub to: u64,
}

impl RowRange {
    /// Returns the `k`-th page of `page_size` rows: `[k·P, (k+1)·P − 1]`.
    ///
    /// `page_size` must be non-zero.
    #[must_use]
    pub fn page(k: u64, page_size: u64) -> Self {
        debug_assert!(page_size > 0, "page size must be non-zero");
        let from = k * page_size;
        Self {
            from,
            to: from + page_size - 1,
        }
    }

    /// Offset for offset/limit style stores.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        self.from
    }

    /// Number of rows the range covers, the limit for offset/limit stores.
    #[must_use]
    pub const fn limit(&self) -> u64 {
        self.to - self.from + 1
    }

    /// Renders the range as a `Range` header value (`from-to`).
    #[must_use]
    pub fn header_value(&self) -> String {
        format!("{}-{}", self.from, self.to)
    }
}
