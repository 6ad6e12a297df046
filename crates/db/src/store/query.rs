//! Store-agnostic query description.

use serde_json::Value;

/// A row predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// `column = value`
    Eq(String, Value),
    /// `column >= value`
    Gte(String, Value),
    /// `column <= value`
    Lte(String, Value),
    /// `column` is one of the values.
    In(String, Vec<Value>),
    /// Every filter holds.
    And(Vec<Filter>),
    /// At least one filter holds.
    Or(Vec<Filter>),
}

impl Filter {
    /// `column = value`
    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Eq(column.into(), value.into())
    }

    /// `column >= value`
    pub fn gte(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Gte(column.into(), value.into())
    }

    /// `column <= value`
    pub fn lte(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Lte(column.into(), value.into())
    }

    /// `column` in `values`.
    pub fn is_in<I, V>(column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::In(column.into(), values.into_iter().map(Into::into).collect())
    }

    /// `start <= column <= end`
    pub fn between(column: &str, start: impl Into<Value>, end: impl Into<Value>) -> Self {
        Self::And(vec![Self::gte(column, start), Self::lte(column, end)])
    }
}

/// Sort key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    /// Column name.
    pub column: String,
    /// Ascending when true.
    pub ascending: bool,
}

/// A read against one table.
///
/// Top-level filters are combined with AND.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    /// Table name.
    pub table: String,
    /// Column list, `*` for all.
    pub select: String,
    /// Filters, all of which must hold.
    pub filters: Vec<Filter>,
    /// Ordering, most significant first.
    pub order: Vec<Order>,
}

impl Query {
    /// Selects every column of `table`.
    pub fn table(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            select: "*".to_string(),
            filters: Vec::new(),
            order: Vec::new(),
        }
    }

    /// Restricts the column list.
    #[must_use]
    pub fn select(mut self, columns: impl Into<String>) -> Self {
        self.select = columns.into();
        self
    }

    /// Adds a filter.
    #[must_use]
    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Adds an ascending sort key.
    #[must_use]
    pub fn order_asc(mut self, column: impl Into<String>) -> Self {
        self.order.push(Order {
            column: column.into(),
            ascending: true,
        });
        self
    }

    /// Adds a descending sort key.
    #[must_use]
    pub fn order_desc(mut self, column: impl Into<String>) -> Self {
        self.order.push(Order {
            column: column.into(),
            ascending: false,
        });
        self
    }
}
