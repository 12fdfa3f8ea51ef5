//! Cash entry entity - an immutable deposit or withdrawal record

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CashEntryKind {
    Deposit,
    Withdrawal,
}

impl std::fmt::Display for CashEntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CashEntryKind::Deposit => write!(f, "deposit"),
            CashEntryKind::Withdrawal => write!(f, "withdrawal"),
        }
    }
}

impl std::str::FromStr for CashEntryKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "deposit" => Ok(CashEntryKind::Deposit),
            "withdrawal" => Ok(CashEntryKind::Withdrawal),
            other => Err(format!("Unknown cash entry kind: {}", other)),
        }
    }
}

/// One entry in the append-only cash log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashEntry {
    pub id: i64,
    pub account_id: String,
    pub kind: CashEntryKind,
    pub amount: Decimal,
    pub note: Option<String>,
    pub recorded_at: DateTime<Utc>,
}

impl CashEntry {
    /// Amount with sign: deposits positive, withdrawals negative.
    pub fn signed_amount(&self) -> Decimal {
        match self.kind {
            CashEntryKind::Deposit => self.amount,
            CashEntryKind::Withdrawal => -self.amount,
        }
    }
}
