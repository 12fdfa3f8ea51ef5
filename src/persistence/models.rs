//! Database Models
//!
//! Write-side inputs for the ledger tables. Read-side rows map directly to
//! the domain entities in `repository.rs`.

use crate::domain::entities::cash_entry::CashEntryKind;
use crate::domain::entities::trade::TradeSide;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Create trade input
#[derive(Debug, Clone)]
pub struct CreateTrade {
    pub account_id: String,
    pub ticker: String,
    pub side: TradeSide,
    pub quantity: Decimal,
    pub price: Decimal,
    pub executed_at: DateTime<Utc>,
}

/// Create cash entry input
#[derive(Debug, Clone)]
pub struct CreateCashEntry {
    pub account_id: String,
    pub kind: CashEntryKind,
    pub amount: Decimal,
    pub note: Option<String>,
    pub recorded_at: DateTime<Utc>,
}
