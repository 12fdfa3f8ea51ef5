//! Account entity - cash state and paper-trading mode for one account

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A ledger account.
///
/// `cash_balance` only changes through a recorded cash entry or a validated
/// trade; `total_deposited` and `total_withdrawn` are monotonically
/// non-decreasing over the account's life (until an explicit reset).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub cash_balance: Decimal,
    pub total_deposited: Decimal,
    pub total_withdrawn: Decimal,
    pub paper_trading_enabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Create a new account with paper trading disabled and zero balances.
    pub fn new(id: String) -> Self {
        let now = Utc::now();
        Account {
            id,
            cash_balance: Decimal::ZERO,
            total_deposited: Decimal::ZERO,
            total_withdrawn: Decimal::ZERO,
            paper_trading_enabled: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Net capital contributed: deposits minus withdrawals.
    pub fn net_deposits(&self) -> Decimal {
        self.total_deposited - self.total_withdrawn
    }

    /// Validate account invariants (check before persisting a mutation)
    pub fn validate(&self) -> Result<(), String> {
        if self.cash_balance < Decimal::ZERO {
            return Err(format!(
                "cash_balance must be non-negative, got {}",
                self.cash_balance
            ));
        }
        if self.total_deposited < Decimal::ZERO {
            return Err(format!(
                "total_deposited must be non-negative, got {}",
                self.total_deposited
            ));
        }
        if self.total_withdrawn < Decimal::ZERO {
            return Err(format!(
                "total_withdrawn must be non-negative, got {}",
                self.total_withdrawn
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_account_new() {
        let account = Account::new("acct-1".to_string());
        assert_eq!(account.id, "acct-1");
        assert_eq!(account.cash_balance, Decimal::ZERO);
        assert_eq!(account.total_deposited, Decimal::ZERO);
        assert_eq!(account.total_withdrawn, Decimal::ZERO);
        assert!(!account.paper_trading_enabled);
        assert!(account.validate().is_ok());
    }

    #[test]
    fn test_account_net_deposits() {
        let mut account = Account::new("acct-1".to_string());
        account.total_deposited = dec!(12000);
        account.total_withdrawn = dec!(2000);
        assert_eq!(account.net_deposits(), dec!(10000));
    }

    #[test]
    fn test_account_validate_negative_balance() {
        let mut account = Account::new("acct-1".to_string());
        account.cash_balance = dec!(-1);
        assert!(account.validate().is_err());
    }
}
