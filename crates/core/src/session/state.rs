//! Generation-guarded view state.

use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Serialize;

/// Monotonically increasing tag of one refresh of a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Generation(u64);

impl Generation {
    /// Raw counter value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for Generation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Outcome of publishing a refresh result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Publish {
    /// The result is now the view's state.
    Applied,
    /// A newer refresh started after this one; the result was discarded.
    Stale,
}

/// Point-in-time copy of a view's state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewSnapshot<T> {
    /// Generation of the applied result, zero before the first one.
    pub generation: u64,
    /// Whether the latest refresh is still in flight.
    pub loading: bool,
    /// Error of the latest applied refresh.
    pub error: Option<String>,
    /// Rows of the latest applied refresh.
    pub rows: Vec<T>,
}

#[derive(Debug)]
struct Inner<T> {
    issued: u64,
    applied: u64,
    rows: Vec<T>,
    error: Option<String>,
}

/// One view's rows plus its refresh bookkeeping.
///
/// The lock is only held for the bookkeeping itself, never across a fetch.
#[derive(Debug)]
pub struct ViewState<T> {
    inner: Mutex<Inner<T>>,
}

impl<T> Default for ViewState<T> {
    fn default() -> Self {
        Self {
            inner: Mutex::new(Inner {
                issued: 0,
                applied: 0,
                rows: Vec::new(),
                error: None,
            }),
        }
    }
}

impl<T: Clone> ViewState<T> {
    /// Creates an empty view state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner<T>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Starts a refresh and returns its generation.
    pub fn begin(&self) -> Generation {
        let mut inner = self.lock();
        inner.issued += 1;
        Generation(inner.issued)
    }

    /// Applies a refresh result unless a newer refresh has started.
    ///
    /// A failed refresh clears the rows and records the error.
    pub fn publish(&self, generation: Generation, result: Result<Vec<T>, String>) -> Publish {
        let mut inner = self.lock();
        if generation.0 != inner.issued || generation.0 <= inner.applied {
            return Publish::Stale;
        }
        inner.applied = generation.0;
        match result {
            Ok(rows) => {
                inner.rows = rows;
                inner.error = None;
            }
            Err(error) => {
                inner.rows.clear();
                inner.error = Some(error);
            }
        }
        Publish::Applied
    }

    /// Copies the current state.
    #[must_use]
    pub fn snapshot(&self) -> ViewSnapshot<T> {
        let inner = self.lock();
        ViewSnapshot {
            generation: inner.applied,
            loading: inner.issued > inner.applied,
            error: inner.error.clone(),
            rows: inner.rows.clone(),
        }
    }

    /// Modifies the first row matching `predicate` and returns its new value.
    pub fn update_first<P, F>(&self, predicate: P, update: F) -> Option<T>
    where
        P: Fn(&T) -> bool,
        F: FnOnce(&mut T),
    {
        let mut inner = self.lock();
        let row = inner.rows.iter_mut().find(|row| predicate(row))?;
        update(row);
        Some(row.clone())
    }
}
