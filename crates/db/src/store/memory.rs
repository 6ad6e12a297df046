//! In-process store evaluating the same filter algebra as the REST store.
//!
//! Used by tests and local demos. It enforces a per-request row cap and can
//! be told to fail specific requests.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use fluxo_shared::RowRange;
use rust_decimal::Decimal;
use serde_json::Value;

use super::{Filter, Page, Query, RemoteStore, StoreError};

/// Tables held in memory.
#[derive(Debug)]
pub struct MemoryStore {
    tables: Mutex<HashMap<String, Vec<Value>>>,
    row_cap: Option<u64>,
    report_totals: bool,
    fail_select_at: Option<usize>,
    fail_updates: bool,
    selects: AtomicUsize,
    updates: AtomicUsize,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self {
            tables: Mutex::new(HashMap::new()),
            row_cap: None,
            report_totals: true,
            fail_select_at: None,
            fail_updates: false,
            selects: AtomicUsize::new(0),
            updates: AtomicUsize::new(0),
        }
    }
}

impl MemoryStore {
    /// Creates an empty store that reports totals and has no row cap.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) a table.
    #[must_use]
    pub fn with_table(self, table: impl Into<String>, rows: Vec<Value>) -> Self {
        self.lock().insert(table.into(), rows);
        self
    }

    /// Caps every read at `cap` rows, like the hosted store does.
    #[must_use]
    pub const fn with_row_cap(mut self, cap: u64) -> Self {
        self.row_cap = Some(cap);
        self
    }

    /// Whether pages carry the total row count.
    #[must_use]
    pub const fn with_totals(mut self, report_totals: bool) -> Self {
        self.report_totals = report_totals;
        self
    }

    /// Makes the `n`-th select (1-based) fail with a 503.
    #[must_use]
    pub const fn failing_select(mut self, n: usize) -> Self {
        self.fail_select_at = Some(n);
        self
    }

    /// Makes every update fail with a 503.
    #[must_use]
    pub const fn failing_updates(mut self) -> Self {
        self.fail_updates = true;
        self
    }

    /// Number of select requests served so far, failed ones included.
    pub fn select_count(&self) -> usize {
        self.selects.load(AtomicOrdering::SeqCst)
    }

    /// Number of update requests served so far, failed ones included.
    pub fn update_count(&self) -> usize {
        self.updates.load(AtomicOrdering::SeqCst)
    }

    /// Copy of a table's rows.
    pub fn rows(&self, table: &str) -> Vec<Value> {
        self.lock().get(table).cloned().unwrap_or_default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Vec<Value>>> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl RemoteStore for MemoryStore {
    async fn select(&self, query: &Query, range: RowRange) -> Result<Page, StoreError> {
        let n = self.selects.fetch_add(1, AtomicOrdering::SeqCst) + 1;
        if self.fail_select_at == Some(n) {
            return Err(unavailable());
        }

        let tables = self.lock();
        let table = tables.get(&query.table).ok_or_else(|| StoreError::Status {
            status: 404,
            body: format!("relation \"{}\" does not exist", query.table),
        })?;

        let mut matching: Vec<&Value> = table
            .iter()
            .filter(|row| query.filters.iter().all(|f| matches(row, f)))
            .collect();
        for order in query.order.iter().rev() {
            matching.sort_by(|a, b| {
                let ordering = order_values(field(a, &order.column), field(b, &order.column));
                if order.ascending {
                    ordering
                } else {
                    ordering.reverse()
                }
            });
        }

        let total = matching.len() as u64;
        let take = self
            .row_cap
            .map_or(range.limit(), |cap| cap.min(range.limit()));
        let rows = matching
            .into_iter()
            .skip(usize::try_from(range.offset()).unwrap_or(usize::MAX))
            .take(usize::try_from(take).unwrap_or(usize::MAX))
            .map(|row| project(row, &query.select))
            .collect();

        Ok(Page {
            rows,
            total: self.report_totals.then_some(total),
        })
    }

    async fn update(
        &self,
        table: &str,
        key_column: &str,
        key: &Value,
        patch: &Value,
    ) -> Result<(), StoreError> {
        self.updates.fetch_add(1, AtomicOrdering::SeqCst);
        if self.fail_updates {
            return Err(unavailable());
        }
        let Value::Object(patch) = patch else {
            return Err(StoreError::InvalidRequest(
                "patch must be a JSON object".to_string(),
            ));
        };

        let mut tables = self.lock();
        let rows = tables.get_mut(table).ok_or_else(|| StoreError::Status {
            status: 404,
            body: format!("relation \"{table}\" does not exist"),
        })?;
        let mut matched = 0;
        for row in rows
            .iter_mut()
            .filter(|row| compare(field(row, key_column), key) == Some(Ordering::Equal))
        {
            matched += 1;
            if let Value::Object(fields) = row {
                for (name, value) in patch {
                    fields.insert(name.clone(), value.clone());
                }
            }
        }
        if matched == 0 {
            return Err(StoreError::NotFound {
                table: table.to_string(),
                key: format!("{key_column}={key}"),
            });
        }
        Ok(())
    }
}

fn unavailable() -> StoreError {
    StoreError::Status {
        status: 503,
        body: "service unavailable".to_string(),
    }
}

fn field<'a>(row: &'a Value, column: &str) -> &'a Value {
    row.get(column).unwrap_or(&Value::Null)
}

fn project(row: &Value, select: &str) -> Value {
    if select.trim() == "*" {
        return row.clone();
    }
    let columns = select.split(',').map(str::trim);
    Value::Object(
        columns
            .filter_map(|c| row.get(c).map(|v| (c.to_string(), v.clone())))
            .collect(),
    )
}

fn matches(row: &Value, filter: &Filter) -> bool {
    match filter {
        Filter::Eq(column, value) => compare(field(row, column), value) == Some(Ordering::Equal),
        Filter::Gte(column, value) => matches!(
            compare(field(row, column), value),
            Some(Ordering::Greater | Ordering::Equal)
        ),
        Filter::Lte(column, value) => matches!(
            compare(field(row, column), value),
            Some(Ordering::Less | Ordering::Equal)
        ),
        Filter::In(column, values) => values
            .iter()
            .any(|v| compare(field(row, column), v) == Some(Ordering::Equal)),
        Filter::And(inner) => inner.iter().all(|f| matches(row, f)),
        Filter::Or(inner) => inner.iter().any(|f| matches(row, f)),
    }
}

fn decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => Decimal::from_str(&n.to_string())
            .or_else(|_| Decimal::from_scientific(&n.to_string()))
            .ok(),
        Value::String(s) => Decimal::from_str(s.trim()).ok(),
        _ => None,
    }
}

/// SQL-like comparison: `NULL` compares with nothing.
fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Null, _) | (_, Value::Null) => None,
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        (Value::Number(_), _) | (_, Value::Number(_)) => Some(decimal(a)?.cmp(&decimal(b)?)),
        _ => None,
    }
}

/// Ordering with nulls last.
fn order_values(a: &Value, b: &Value) -> Ordering {
    match (a.is_null(), b.is_null()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => compare(a, b).unwrap_or(Ordering::Equal),
    }
}
