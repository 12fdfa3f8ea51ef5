pub mod cash_ledger;
pub mod pl_report;
pub mod position_tracker;
pub mod valuation;
