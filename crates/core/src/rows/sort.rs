//! Stable sorting of display rows.

use std::cmp::Ordering;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::reconcile::{DisplayRow, ReportError};

/// Column to sort by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    /// Effective date.
    #[default]
    Date,
    /// Display name.
    Name,
    /// Category description.
    Category,
    /// Invoice number.
    InvoiceNumber,
    /// Project name.
    Project,
    /// Display amount.
    Amount,
    /// Paid or open.
    Status,
    /// Installment label.
    Installment,
}

impl FromStr for SortField {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "date" | "effective_date" => Ok(Self::Date),
            "name" => Ok(Self::Name),
            "category" => Ok(Self::Category),
            "invoice_number" | "invoice" => Ok(Self::InvoiceNumber),
            "project" => Ok(Self::Project),
            "amount" | "value" => Ok(Self::Amount),
            "status" => Ok(Self::Status),
            "installment" => Ok(Self::Installment),
            _ => Err(ReportError::UnknownSortField(s.to_string())),
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Smallest first.
    #[default]
    Asc,
    /// Largest first.
    Desc,
}

impl FromStr for SortDirection {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(ReportError::UnknownSortDirection(s.to_string())),
        }
    }
}

fn text_cmp(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

fn compare(a: &DisplayRow, b: &DisplayRow, field: SortField) -> Ordering {
    match field {
        SortField::Date => a.effective_date.cmp(&b.effective_date),
        SortField::Name => text_cmp(&a.name, &b.name),
        SortField::Category => text_cmp(&a.category, &b.category),
        SortField::InvoiceNumber => text_cmp(&a.invoice_number, &b.invoice_number),
        SortField::Project => text_cmp(&a.project, &b.project),
        SortField::Amount => a.amount.cmp(&b.amount),
        SortField::Status => a.status.cmp(&b.status),
        SortField::Installment => text_cmp(&a.installment, &b.installment),
    }
}

/// Sorts rows in place. Ties keep their input order in both directions.
pub fn sort_rows(rows: &mut [DisplayRow], field: SortField, direction: SortDirection) {
    rows.sort_by(|a, b| {
        let ordering = compare(a, b, field);
        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::PaymentStatus;
    use chrono::NaiveDate;
    use fluxo_shared::types::MovementId;
    use rstest::rstest;
    use rust_decimal::Decimal;

    fn row(id: i64, day: u32, name: &str, cents: i64) -> DisplayRow {
        DisplayRow {
            movement_id: MovementId::new(id),
            line_sequence: None,
            effective_date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            name: name.to_string(),
            category: "N/A".to_string(),
            invoice_number: "N/A".to_string(),
            project: "N/A".to_string(),
            amount: Decimal::new(cents, 2),
            status: PaymentStatus::Open,
            installment: "N/A".to_string(),
            payment_type: None,
            description: None,
        }
    }

    fn ids(rows: &[DisplayRow]) -> Vec<i64> {
        rows.iter().map(|r| r.movement_id.into_inner()).collect()
    }

    #[test]
    fn test_sort_by_amount_desc() {
        let mut rows = vec![row(1, 1, "a", 500), row(2, 2, "b", 1500), row(3, 3, "c", 900)];
        sort_rows(&mut rows, SortField::Amount, SortDirection::Desc);
        assert_eq!(ids(&rows), vec![2, 3, 1]);
    }

    #[test]
    fn test_sort_by_name_ignores_case() {
        let mut rows = vec![row(1, 1, "beta", 1), row(2, 1, "Alfa", 1), row(3, 1, "Gama", 1)];
        sort_rows(&mut rows, SortField::Name, SortDirection::Asc);
        assert_eq!(ids(&rows), vec![2, 1, 3]);
    }

    #[rstest]
    #[case(SortDirection::Asc)]
    #[case(SortDirection::Desc)]
    fn test_ties_keep_input_order(#[case] direction: SortDirection) {
        let mut rows = vec![
            row(1, 5, "x", 100),
            row(2, 5, "y", 100),
            row(3, 5, "z", 100),
        ];
        sort_rows(&mut rows, SortField::Date, direction);
        assert_eq!(ids(&rows), vec![1, 2, 3]);
    }

    #[test]
    fn test_desc_ties_stay_stable_among_distinct_keys() {
        let mut rows = vec![
            row(1, 1, "x", 100),
            row(2, 9, "y", 100),
            row(3, 1, "z", 100),
            row(4, 9, "w", 100),
        ];
        sort_rows(&mut rows, SortField::Date, SortDirection::Desc);
        assert_eq!(ids(&rows), vec![2, 4, 1, 3]);
    }

    #[rstest]
    #[case("date", SortField::Date)]
    #[case("Amount", SortField::Amount)]
    #[case("invoice_number", SortField::InvoiceNumber)]
    #[case(" project ", SortField::Project)]
    fn test_parse_sort_field(#[case] raw: &str, #[case] expected: SortField) {
        assert_eq!(raw.parse::<SortField>().unwrap(), expected);
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert!("colour".parse::<SortField>().is_err());
        assert!("sideways".parse::<SortDirection>().is_err());
        assert_eq!("DESC".parse::<SortDirection>().unwrap(), SortDirection::Desc);
    }
}
