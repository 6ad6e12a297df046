//! Totals for the summary cards and charts.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::reconcile::{DisplayRow, PaymentStatus};

/// One labelled total in a chart series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryBucket {
    /// Category description or `YYYY-MM` month.
    pub label: String,
    /// Sum of row amounts.
    pub total: Decimal,
    /// Number of rows.
    pub count: usize,
}

/// Totals over a row list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    /// Number of rows.
    pub row_count: usize,
    /// Sum of every row.
    pub total: Decimal,
    /// Sum of paid rows.
    pub paid_total: Decimal,
    /// Sum of open rows.
    pub open_total: Decimal,
    /// Totals per category, in first-seen order.
    pub by_category: Vec<SummaryBucket>,
    /// Totals per effective-date month, ascending.
    pub by_month: Vec<SummaryBucket>,
}

/// Computes totals over `rows`.
#[must_use]
pub fn summarize(rows: &[DisplayRow]) -> ReportSummary {
    let mut summary = ReportSummary {
        row_count: rows.len(),
        ..ReportSummary::default()
    };
    let mut months: BTreeMap<String, SummaryBucket> = BTreeMap::new();

    for row in rows {
        summary.total += row.amount;
        match row.status {
            PaymentStatus::Paid => summary.paid_total += row.amount,
            PaymentStatus::Open => summary.open_total += row.amount,
        }

        match summary
            .by_category
            .iter_mut()
            .find(|bucket| bucket.label == row.category)
        {
            Some(bucket) => {
                bucket.total += row.amount;
                bucket.count += 1;
            }
            None => summary.by_category.push(SummaryBucket {
                label: row.category.clone(),
                total: row.amount,
                count: 1,
            }),
        }

        let month = row.effective_date.format("%Y-%m").to_string();
        let bucket = months.entry(month.clone()).or_insert_with(|| SummaryBucket {
            label: month,
            total: Decimal::ZERO,
            count: 0,
        });
        bucket.total += row.amount;
        bucket.count += 1;
    }

    summary.by_month = months.into_values().collect();
    summary
}
