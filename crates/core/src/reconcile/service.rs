//! Reconciliation service.

use std::collections::HashMap;

use chrono::NaiveDate;
use fluxo_shared::types::{CategoryId, ProjectId};
use rust_decimal::Decimal;

use super::types::{
    DisplayRow, Invoice, JoinDepth, LineItem, Movement, NOT_AVAILABLE, PaymentStatus,
    ReconcileInput, ReconcileOptions, non_blank,
};

/// Merges movements, invoice headers and line items into display rows.
pub struct Reconciler;

/// A movement that survived selection, with its resolved header.
struct Selected<'a> {
    movement: &'a Movement,
    header: Option<&'a Invoice>,
    date: NaiveDate,
}

/// Lookup tables built once per reconciliation.
struct Lookups<'a> {
    invoices: HashMap<&'a str, &'a Invoice>,
    line_items: HashMap<&'a str, Vec<&'a LineItem>>,
    projects: HashMap<ProjectId, &'a str>,
    categories: HashMap<CategoryId, &'a str>,
}

impl<'a> Lookups<'a> {
    fn build(input: &'a ReconcileInput) -> Self {
        let mut invoices = HashMap::new();
        for invoice in &input.invoices {
            if let Some(key) = non_blank(Some(invoice.invoice_key.as_str())) {
                invoices.entry(key).or_insert(invoice);
            }
        }

        let mut line_items: HashMap<&str, Vec<&LineItem>> = HashMap::new();
        for item in &input.line_items {
            if let Some(key) = non_blank(Some(item.invoice_key.as_str())) {
                line_items.entry(key).or_default().push(item);
            }
        }
        for items in line_items.values_mut() {
            items.sort_by_key(|item| (item.sequence.is_none(), item.sequence));
        }

        Self {
            invoices,
            line_items,
            projects: input
                .projects
                .iter()
                .map(|p| (p.id, p.name.as_str()))
                .collect(),
            categories: input
                .categories
                .iter()
                .map(|c| (c.id, c.description.as_str()))
                .collect(),
        }
    }
}

impl Reconciler {
    /// Produces the flat row list for `options` from raw record sets.
    ///
    /// Rows come out in movement input order. With [`JoinDepth::LineItems`]
    /// each invoice's items appear once, at the position of its first
    /// surviving movement.
    #[must_use]
    pub fn reconcile(options: &ReconcileOptions, input: &ReconcileInput) -> Vec<DisplayRow> {
        let lookups = Lookups::build(input);
        let selected: Vec<Selected<'_>> = input
            .movements
            .iter()
            .filter_map(|movement| Self::select(options, &lookups, movement))
            .collect();

        match options.join {
            JoinDepth::LineItems => Self::expand_line_items(&lookups, &selected),
            JoinDepth::None | JoinDepth::Header => selected
                .iter()
                .map(|s| Self::movement_row(&lookups, s))
                .collect(),
        }
    }

    /// Applies every row-level filter to one movement.
    fn select<'a>(
        options: &ReconcileOptions,
        lookups: &Lookups<'a>,
        movement: &'a Movement,
    ) -> Option<Selected<'a>> {
        let date = movement.effective_date()?;
        if !options.window.contains(date) {
            return None;
        }

        let linked = movement
            .invoice_key()
            .and_then(|key| lookups.invoices.get(key).copied());

        if let Some(project) = options.project {
            let header_project = linked.and_then(|h| h.project_id);
            if movement.project_id != Some(project) && header_project != Some(project) {
                return None;
            }
        }

        if let Some(types) = &options.payment_types {
            match movement.payment_type_code() {
                Some(code) if types.contains(&code) => {}
                _ => return None,
            }
        }

        if let Some(wanted) = options.invoice_key.as_deref() {
            if movement.invoice_key() != Some(wanted.trim()) {
                return None;
            }
        }

        let header = match options.join {
            JoinDepth::None => None,
            JoinDepth::Header | JoinDepth::LineItems => linked,
        };

        if !options.keywords_allow(&search_text(movement, header)) {
            return None;
        }

        Some(Selected {
            movement,
            header,
            date,
        })
    }

    fn movement_row(lookups: &Lookups<'_>, selected: &Selected<'_>) -> DisplayRow {
        let Selected {
            movement,
            header,
            date,
        } = *selected;

        DisplayRow {
            movement_id: movement.id,
            line_sequence: None,
            effective_date: date,
            name: display_name(movement, header),
            category: category_name(lookups, movement, header),
            invoice_number: first_or_na(&[
                header.and_then(|h| h.invoice_number.as_deref()),
                movement.invoice_number.as_deref(),
            ]),
            project: project_name(lookups, movement, header),
            amount: movement.display_amount(),
            status: movement.payment_status(),
            installment: first_or_na(&[movement.installment.as_deref()]),
            payment_type: movement.payment_type_code(),
            description: non_blank(movement.description.as_deref()).map(str::to_string),
        }
    }

    /// Strict inner join to line items, one row per item per invoice.
    fn expand_line_items(lookups: &Lookups<'_>, selected: &[Selected<'_>]) -> Vec<DisplayRow> {
        let mut order: Vec<&str> = Vec::new();
        let mut groups: HashMap<&str, Vec<&Selected<'_>>> = HashMap::new();

        for s in selected {
            let Some(key) = s.movement.invoice_key() else {
                continue;
            };
            if s.header.is_none() || !lookups.line_items.contains_key(key) {
                continue;
            }
            groups
                .entry(key)
                .or_insert_with(|| {
                    order.push(key);
                    Vec::new()
                })
                .push(s);
        }

        let mut rows = Vec::new();
        for key in order {
            let group = &groups[key];
            let first = group[0];
            let status = if group.iter().all(|s| s.movement.is_paid) {
                PaymentStatus::Paid
            } else {
                PaymentStatus::Open
            };
            let base = Self::movement_row(lookups, first);

            for item in &lookups.line_items[key] {
                rows.push(DisplayRow {
                    line_sequence: item.sequence,
                    amount: item.value.unwrap_or(Decimal::ZERO),
                    status,
                    description: non_blank(item.description.as_deref())
                        .map(str::to_string)
                        .or_else(|| base.description.clone()),
                    ..base.clone()
                });
            }
        }
        rows
    }
}

/// Lower-cased concatenation of the searchable text fields.
fn search_text(movement: &Movement, header: Option<&Invoice>) -> String {
    [
        header.and_then(|h| h.invoice_number.as_deref()),
        movement.invoice_number.as_deref(),
        movement.description.as_deref(),
        movement.payment_type.as_deref(),
        movement.title.as_deref(),
        movement.supplier_name.as_deref(),
        header.and_then(|h| h.supplier_name.as_deref()),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>()
    .join(" ")
    .to_lowercase()
}

fn display_name(movement: &Movement, header: Option<&Invoice>) -> String {
    let id = movement.id.to_string();
    first_or_na(&[
        movement.title.as_deref(),
        movement.supplier_name.as_deref(),
        header.and_then(|h| h.supplier_name.as_deref()),
        movement.description.as_deref(),
        Some(id.as_str()),
    ])
}

fn category_name(lookups: &Lookups<'_>, movement: &Movement, header: Option<&Invoice>) -> String {
    first_or_na(&[
        movement
            .category_id
            .and_then(|id| lookups.categories.get(&id).copied()),
        header.and_then(|h| h.category.as_deref()),
    ])
}

fn project_name(lookups: &Lookups<'_>, movement: &Movement, header: Option<&Invoice>) -> String {
    first_or_na(&[movement
        .project_id
        .or_else(|| header.and_then(|h| h.project_id))
        .and_then(|id| lookups.projects.get(&id).copied())])
}

fn first_or_na(candidates: &[Option<&str>]) -> String {
    candidates
        .iter()
        .find_map(|c| non_blank(*c))
        .unwrap_or(NOT_AVAILABLE)
        .to_string()
}
