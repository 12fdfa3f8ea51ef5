use rust_decimal::Decimal;
use thiserror::Error;

/// Errors produced by ledger operations.
///
/// Every variant is detected before any state mutation; a caller receiving
/// one of these can retry or correct its input without repair work.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LedgerError {
    #[error("Amount must be positive")]
    InvalidAmount,

    #[error("Insufficient funds: required {required:.2}, available {available:.2}")]
    InsufficientFunds {
        required: Decimal,
        available: Decimal,
    },

    #[error("Insufficient shares of {ticker}: requested {requested}, held {held}")]
    InsufficientShares {
        ticker: String,
        requested: Decimal,
        held: Decimal,
    },

    #[error("{0}")]
    AlreadyInState(String),

    #[error("Account not found: {0}")]
    AccountNotFound(String),

    #[error("Database error: {0}")]
    Database(String),
}

/// Errors from the market-data collaborator.
///
/// A missing price is non-fatal: the valuation engine degrades the affected
/// position to a zero valuation instead of failing the whole report.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PriceError {
    #[error("No price available for {0}")]
    Unavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_insufficient_funds_message() {
        let err = LedgerError::InsufficientFunds {
            required: dec!(1500.00),
            available: dec!(1000.00),
        };
        let msg = err.to_string();
        assert!(msg.contains("1500"));
        assert!(msg.contains("1000"));
    }

    #[test]
    fn test_insufficient_shares_message() {
        let err = LedgerError::InsufficientShares {
            ticker: "AAPL".to_string(),
            requested: dec!(10),
            held: dec!(6),
        };
        let msg = err.to_string();
        assert!(msg.contains("AAPL"));
        assert!(msg.contains("10"));
        assert!(msg.contains("6"));
    }

    #[test]
    fn test_price_unavailable_message() {
        let err = PriceError::Unavailable("MSFT".to_string());
        assert!(err.to_string().contains("MSFT"));
    }
}
