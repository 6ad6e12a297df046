//! Query parameter parsing shared by the report routes.

use chrono::{Local, NaiveDate};
use fluxo_core::reconcile::ReportError;
use fluxo_shared::types::ProjectId;
use fluxo_shared::{AppError, DateWindow};

/// Builds the report window.
///
/// With neither bound the window is the month of `today`. A single bound is
/// completed with the edge of its own month.
pub fn resolve_window(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    today: NaiveDate,
) -> Result<DateWindow, ReportError> {
    let window = match (start, end) {
        (Some(start), Some(end)) => DateWindow::new(start, end)?,
        (Some(start), None) => DateWindow::new(start, DateWindow::month_of(start).end())?,
        (None, Some(end)) => DateWindow::new(DateWindow::month_of(end).start(), end)?,
        (None, None) => DateWindow::month_of(today),
    };
    Ok(window)
}

/// [`resolve_window`] against the local calendar.
pub fn window_or_current_month(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<DateWindow, ReportError> {
    resolve_window(start, end, Local::now().date_naive())
}

/// Parses the optional project filter. Blank means all projects.
pub fn parse_project(raw: Option<&str>) -> Result<Option<ProjectId>, AppError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| AppError::Validation(format!("Invalid project id: {value}"))),
    }
}
