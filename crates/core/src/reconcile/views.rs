//! Named report views.
//!
//! Each dashboard screen is the same reconciliation with a different payment
//! type set and join depth.

use std::str::FromStr;

use fluxo_shared::DateWindow;
use serde::{Deserialize, Serialize};

use super::error::ReportError;
use super::types::{JoinDepth, ReconcileOptions};

/// A dashboard screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViewKind {
    /// Every movement in the window.
    Dashboard,
    /// Product invoices (NF-e).
    Nfe,
    /// Product invoices broken down per line item.
    NfeDetail,
    /// Service invoices (NFS-e).
    Nfs,
    /// Salaries, 13th salary and vacation pay.
    Payroll,
}

impl ViewKind {
    /// Every view, in menu order.
    pub const ALL: [Self; 5] = [
        Self::Dashboard,
        Self::Nfe,
        Self::NfeDetail,
        Self::Nfs,
        Self::Payroll,
    ];

    /// URL and configuration slug.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::Nfe => "nfe",
            Self::NfeDetail => "nfe-detail",
            Self::Nfs => "nfs",
            Self::Payroll => "payroll",
        }
    }

    /// Payment type codes the view is restricted to, `None` for all.
    #[must_use]
    pub const fn payment_types(self) -> Option<&'static [&'static str]> {
        match self {
            Self::Dashboard => None,
            Self::Nfe | Self::NfeDetail => Some(&["NFE"]),
            Self::Nfs => Some(&["NFS"]),
            Self::Payroll => Some(&["SAL", "13S", "FER"]),
        }
    }

    /// How far the view joins related tables.
    #[must_use]
    pub const fn join_depth(self) -> JoinDepth {
        match self {
            Self::Dashboard | Self::Nfe | Self::Nfs => JoinDepth::Header,
            Self::NfeDetail => JoinDepth::LineItems,
            Self::Payroll => JoinDepth::None,
        }
    }

    /// Base options for this view over `window`.
    #[must_use]
    pub fn options(self, window: DateWindow) -> ReconcileOptions {
        let options = ReconcileOptions::new(window).with_join(self.join_depth());
        match self.payment_types() {
            Some(types) => options.with_payment_types(types.iter().copied()),
            None => options,
        }
    }
}

impl std::fmt::Display for ViewKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for ViewKind {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|view| view.slug() == wanted)
            .ok_or_else(|| ReportError::UnknownView(s.to_string()))
    }
}
