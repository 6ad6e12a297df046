//! Record and display-row types for reconciliation.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use fluxo_shared::DateWindow;
use fluxo_shared::types::{CategoryId, MovementId, ProjectId};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use super::effective::effective_date;

/// Placeholder for fields that cannot be resolved.
pub const NOT_AVAILABLE: &str = "N/A";

/// A ledger movement: one installment of a payable or receivable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Movement {
    /// Movement ID.
    pub id: MovementId,
    /// Link to a purchase invoice.
    pub invoice_key: Option<String>,
    /// Project reference.
    pub project_id: Option<ProjectId>,
    /// Category reference.
    pub category_id: Option<CategoryId>,
    /// Issue date.
    pub issue_date: Option<NaiveDate>,
    /// Due date.
    pub due_date: Option<NaiveDate>,
    /// Payment date, when settled.
    pub payment_date: Option<NaiveDate>,
    /// Whether the installment is settled. Missing or null reads as open.
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_paid: bool,
    /// Ledger status text derived from the paid flag.
    pub status: Option<String>,
    /// Net amount.
    pub net_amount: Option<Decimal>,
    /// Original (gross) amount.
    pub original_amount: Option<Decimal>,
    /// Amount actually paid.
    pub paid_amount: Option<Decimal>,
    /// Installment label, e.g. `2/5`.
    pub installment: Option<String>,
    /// Free-text description.
    pub description: Option<String>,
    /// Payment type code (`NFE`, `NFS`, `SAL`, ...).
    pub payment_type: Option<String>,
    /// Explicit title.
    pub title: Option<String>,
    /// Supplier or customer name as recorded on the movement.
    pub supplier_name: Option<String>,
    /// Document number as recorded on the movement.
    pub invoice_number: Option<String>,
}

impl Movement {
    /// Creates an empty movement with the given ID.
    #[must_use]
    pub fn new(id: i64) -> Self {
        Self {
            id: MovementId::new(id),
            ..Self::default()
        }
    }

    /// See [`effective_date`].
    #[must_use]
    pub fn effective_date(&self) -> Option<NaiveDate> {
        effective_date(self.is_paid, self.payment_date, self.due_date, self.issue_date)
    }

    /// First present amount of net, original, paid; zero otherwise.
    #[must_use]
    pub fn display_amount(&self) -> Decimal {
        self.net_amount
            .or(self.original_amount)
            .or(self.paid_amount)
            .unwrap_or(Decimal::ZERO)
    }

    /// Trimmed invoice key, `None` when blank.
    #[must_use]
    pub fn invoice_key(&self) -> Option<&str> {
        non_blank(self.invoice_key.as_deref())
    }

    /// Upper-cased payment type code, `None` when blank.
    #[must_use]
    pub fn payment_type_code(&self) -> Option<String> {
        non_blank(self.payment_type.as_deref()).map(str::to_uppercase)
    }

    /// Paid or open.
    #[must_use]
    pub const fn payment_status(&self) -> PaymentStatus {
        if self.is_paid {
            PaymentStatus::Paid
        } else {
            PaymentStatus::Open
        }
    }
}

/// A purchase invoice header.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    /// Invoice key shared with movements and line items.
    #[serde(default, deserialize_with = "null_as_default")]
    pub invoice_key: String,
    /// Invoice number.
    pub invoice_number: Option<String>,
    /// Supplier tax ID.
    pub supplier_tax_id: Option<String>,
    /// Supplier legal name.
    pub supplier_name: Option<String>,
    /// Issue date.
    pub issue_date: Option<NaiveDate>,
    /// Invoice total.
    pub total_amount: Option<Decimal>,
    /// Category description.
    pub category: Option<String>,
    /// Project reference.
    pub project_id: Option<ProjectId>,
}

/// A purchase invoice line item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Owning invoice key.
    #[serde(default, deserialize_with = "null_as_default")]
    pub invoice_key: String,
    /// Sequence number within the invoice. Unnumbered items sort last.
    pub sequence: Option<u32>,
    /// Item description.
    pub description: Option<String>,
    /// Item value.
    pub value: Option<Decimal>,
}

/// Project lookup row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Project ID.
    pub id: ProjectId,
    /// Project name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

/// Category lookup row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Category ID.
    pub id: CategoryId,
    /// Category description.
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
}

/// Settlement status of a display row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Not yet settled.
    Open,
    /// Settled.
    Paid,
}

/// How far to join related tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinDepth {
    /// Movements only.
    None,
    /// Attach invoice header fields.
    #[default]
    Header,
    /// Attach headers and emit one row per line item.
    LineItems,
}

/// One flat, display-ready row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayRow {
    /// Source movement.
    pub movement_id: MovementId,
    /// Line-item sequence when the row grain is the line item.
    pub line_sequence: Option<u32>,
    /// Effective date.
    pub effective_date: NaiveDate,
    /// Display name.
    pub name: String,
    /// Category description.
    pub category: String,
    /// Invoice number.
    pub invoice_number: String,
    /// Project name.
    pub project: String,
    /// Display amount.
    pub amount: Decimal,
    /// Paid or open.
    pub status: PaymentStatus,
    /// Installment label.
    pub installment: String,
    /// Payment type code.
    pub payment_type: Option<String>,
    /// Description (the line item's own for line-item rows).
    pub description: Option<String>,
}

/// Filter configuration for one reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileOptions {
    /// Authoritative effective-date window.
    pub window: DateWindow,
    /// Restrict to one project.
    pub project: Option<ProjectId>,
    /// Restrict to these payment type codes (upper-case).
    pub payment_types: Option<BTreeSet<String>>,
    /// Rows must contain one of these (lower-case) when non-empty.
    pub include_keywords: Vec<String>,
    /// Rows containing any of these (lower-case) are dropped.
    pub exclude_keywords: Vec<String>,
    /// Restrict to one invoice.
    pub invoice_key: Option<String>,
    /// Join depth.
    pub join: JoinDepth,
}

impl ReconcileOptions {
    /// Options selecting every movement in the window, joined to headers.
    #[must_use]
    pub fn new(window: DateWindow) -> Self {
        Self {
            window,
            project: None,
            payment_types: None,
            include_keywords: Vec::new(),
            exclude_keywords: Vec::new(),
            invoice_key: None,
            join: JoinDepth::Header,
        }
    }

    /// Restricts to one project.
    #[must_use]
    pub const fn with_project(mut self, project: Option<ProjectId>) -> Self {
        self.project = project;
        self
    }

    /// Restricts to a set of payment type codes.
    #[must_use]
    pub fn with_payment_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let set: BTreeSet<String> = types
            .into_iter()
            .filter_map(|t| non_blank(Some(t.as_ref())).map(str::to_uppercase))
            .collect();
        self.payment_types = Some(set);
        self
    }

    /// Sets include and exclude keyword lists.
    #[must_use]
    pub fn with_keywords<S: AsRef<str>>(mut self, include: &[S], exclude: &[S]) -> Self {
        self.include_keywords = normalize_keywords(include);
        self.exclude_keywords = normalize_keywords(exclude);
        self
    }

    /// Restricts to one invoice.
    #[must_use]
    pub fn with_invoice_key(mut self, invoice_key: Option<String>) -> Self {
        self.invoice_key = invoice_key.filter(|k| !k.trim().is_empty());
        self
    }

    /// Sets the join depth.
    #[must_use]
    pub const fn with_join(mut self, join: JoinDepth) -> Self {
        self.join = join;
        self
    }

    /// Applies the keyword lists to a lower-cased search text.
    #[must_use]
    pub fn keywords_allow(&self, haystack: &str) -> bool {
        if self
            .exclude_keywords
            .iter()
            .any(|k| haystack.contains(k.as_str()))
        {
            return false;
        }
        self.include_keywords.is_empty()
            || self
                .include_keywords
                .iter()
                .any(|k| haystack.contains(k.as_str()))
    }
}

/// Raw record sets handed to the reconciler.
#[derive(Debug, Clone, Default)]
pub struct ReconcileInput {
    /// Movements fetched for the superset window.
    pub movements: Vec<Movement>,
    /// Headers for the distinct invoice keys of `movements`.
    pub invoices: Vec<Invoice>,
    /// Line items for the same keys.
    pub line_items: Vec<LineItem>,
    /// Projects referenced by movements or headers.
    pub projects: Vec<Project>,
    /// Categories referenced by movements.
    pub categories: Vec<Category>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn normalize_keywords<S: AsRef<str>>(keywords: &[S]) -> Vec<String> {
    keywords
        .iter()
        .filter_map(|k| non_blank(Some(k.as_ref())).map(str::to_lowercase))
        .collect()
}
