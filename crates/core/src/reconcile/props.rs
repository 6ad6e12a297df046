//! Property-based tests for the reconciler.
//!
//! - Effective date is a pure function of its four inputs
//! - Rows outside the window never reach the output
//! - An unlinked movement inside the window yields exactly one placeholder row

use chrono::{Days, NaiveDate};
use fluxo_shared::DateWindow;
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::effective::effective_date;
use super::service::Reconciler;
use super::types::{Movement, NOT_AVAILABLE, ReconcileInput, ReconcileOptions};

fn base() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

/// Strategy to generate a date within 2024.
fn date() -> impl Strategy<Value = NaiveDate> {
    (0u64..366).prop_map(|offset| base() + Days::new(offset))
}

/// Strategy to generate an optional date within 2024.
fn maybe_date() -> impl Strategy<Value = Option<NaiveDate>> {
    prop::option::of(date())
}

/// Strategy to generate a valid window within 2024.
fn window() -> impl Strategy<Value = DateWindow> {
    (date(), date()).prop_map(|(a, b)| {
        let (start, end) = if a <= b { (a, b) } else { (b, a) };
        DateWindow::new(start, end).unwrap()
    })
}

/// Strategy to generate an unlinked movement with arbitrary dates.
fn movement() -> impl Strategy<Value = Movement> {
    (
        1i64..10_000,
        any::<bool>(),
        maybe_date(),
        maybe_date(),
        maybe_date(),
        prop::option::of(0i64..1_000_000),
    )
        .prop_map(|(id, is_paid, payment, due, issue, cents)| Movement {
            is_paid,
            payment_date: payment,
            due_date: due,
            issue_date: issue,
            net_amount: cents.map(|c| Decimal::new(c, 2)),
            ..Movement::new(id)
        })
}

proptest! {
    #[test]
    fn effective_date_is_pure(
        is_paid in any::<bool>(),
        payment in maybe_date(),
        due in maybe_date(),
        issue in maybe_date(),
    ) {
        let first = effective_date(is_paid, payment, due, issue);
        let second = effective_date(is_paid, payment, due, issue);
        prop_assert_eq!(first, second);

        if let Some(date) = first {
            prop_assert!([payment, due, issue].contains(&Some(date)));
        } else {
            prop_assert!(issue.is_none());
        }
    }

    #[test]
    fn rows_outside_window_are_never_selected(
        movements in prop::collection::vec(movement(), 0..40),
        window in window(),
    ) {
        let input = ReconcileInput { movements: movements.clone(), ..ReconcileInput::default() };
        let rows = Reconciler::reconcile(&ReconcileOptions::new(window), &input);

        let expected = movements
            .iter()
            .filter(|m| m.effective_date().is_some_and(|d| window.contains(d)))
            .count();
        prop_assert_eq!(rows.len(), expected);
        for row in &rows {
            prop_assert!(window.contains(row.effective_date));
        }
    }

    #[test]
    fn unlinked_movement_yields_one_placeholder_row(
        movement in movement(),
        window in window(),
        offset in 0u64..366,
    ) {
        let span = u64::try_from((window.end() - window.start()).num_days()).unwrap() + 1;
        let inside = window.start() + Days::new(offset % span);
        let movement = Movement {
            issue_date: Some(inside),
            due_date: None,
            payment_date: None,
            ..movement
        };

        let input = ReconcileInput { movements: vec![movement.clone()], ..ReconcileInput::default() };
        let rows = Reconciler::reconcile(&ReconcileOptions::new(window), &input);

        prop_assert_eq!(rows.len(), 1);
        let row = &rows[0];
        prop_assert_eq!(row.movement_id, movement.id);
        prop_assert_eq!(row.amount, movement.display_amount());
        prop_assert_eq!(row.category.as_str(), NOT_AVAILABLE);
        prop_assert_eq!(row.invoice_number.as_str(), NOT_AVAILABLE);
        prop_assert_eq!(row.project.as_str(), NOT_AVAILABLE);
    }
}
