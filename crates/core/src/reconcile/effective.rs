//! Effective date derivation.
//!
//! The effective date is the authoritative date for cash-basis reporting:
//! a settled movement counts on the day it was paid, an open one on the day
//! it falls due.

use chrono::NaiveDate;

/// Computes the effective date of a movement.
///
/// `is_paid ? (payment_date ?? due_date) : (due_date ?? issue_date)`, falling
/// back to `issue_date` when that yields nothing. Returns `None` only when no
/// date is known at all.
#[must_use]
pub fn effective_date(
    is_paid: bool,
    payment_date: Option<NaiveDate>,
    due_date: Option<NaiveDate>,
    issue_date: Option<NaiveDate>,
) -> Option<NaiveDate> {
    let primary = if is_paid {
        payment_date.or(due_date)
    } else {
        due_date.or(issue_date)
    };
    primary.or(issue_date)
}
