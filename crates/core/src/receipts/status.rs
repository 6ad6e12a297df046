//! Receipt status values.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Status of a receivable.
///
/// The store does not enforce the set, so unknown values are carried through
/// unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ReceiptStatus {
    /// Money received.
    Received,
    /// Awaiting payment.
    Pending,
    /// Past due.
    Late,
    /// Cancelled.
    Cancelled,
    /// Any other value found in the store.
    Other(String),
}

impl ReceiptStatus {
    /// Store representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Received => "RECEIVED",
            Self::Pending => "PENDING",
            Self::Late => "LATE",
            Self::Cancelled => "CANCELLED",
            Self::Other(raw) => raw,
        }
    }
}

impl From<String> for ReceiptStatus {
    fn from(raw: String) -> Self {
        match raw.trim().to_uppercase().as_str() {
            "RECEIVED" | "RECEBIDO" => Self::Received,
            "PENDING" | "PENDENTE" => Self::Pending,
            "LATE" | "ATRASADO" => Self::Late,
            "CANCELLED" | "CANCELADO" => Self::Cancelled,
            _ => Self::Other(raw),
        }
    }
}

impl From<ReceiptStatus> for String {
    fn from(status: ReceiptStatus) -> Self {
        match status {
            ReceiptStatus::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl FromStr for ReceiptStatus {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s.to_string()))
    }
}

impl std::fmt::Display for ReceiptStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
