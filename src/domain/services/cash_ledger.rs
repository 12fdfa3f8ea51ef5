//! Cash ledger - deposit and withdrawal application against an account
//!
//! The cash log itself is append-only; these functions apply a single
//! validated movement to the account's running balance and monotone totals.
//! Persisting the matching `CashEntry` row is the caller's job, in the same
//! transaction as the account update.

use crate::domain::entities::account::Account;
use crate::domain::errors::LedgerError;
use rust_decimal::Decimal;

/// Apply a deposit: balance and total_deposited both grow by `amount`.
pub fn deposit(account: &mut Account, amount: Decimal) -> Result<(), LedgerError> {
    if amount <= Decimal::ZERO {
        return Err(LedgerError::InvalidAmount);
    }
    account.cash_balance += amount;
    account.total_deposited += amount;
    Ok(())
}

/// Apply a withdrawal: balance shrinks, total_withdrawn grows.
///
/// Fails with `InsufficientFunds` when `amount` exceeds the current balance,
/// so `cash_balance` can never go negative through this path.
pub fn withdraw(account: &mut Account, amount: Decimal) -> Result<(), LedgerError> {
    if amount <= Decimal::ZERO {
        return Err(LedgerError::InvalidAmount);
    }
    if amount > account.cash_balance {
        return Err(LedgerError::InsufficientFunds {
            required: amount,
            available: account.cash_balance,
        });
    }
    account.cash_balance -= amount;
    account.total_withdrawn += amount;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn account() -> Account {
        Account::new("acct-1".to_string())
    }

    #[test]
    fn test_deposit_increases_balance_and_total() {
        let mut account = account();
        deposit(&mut account, dec!(10000)).unwrap();
        assert_eq!(account.cash_balance, dec!(10000));
        assert_eq!(account.total_deposited, dec!(10000));
        assert_eq!(account.total_withdrawn, Decimal::ZERO);
    }

    #[test]
    fn test_deposit_rejects_non_positive() {
        let mut account = account();
        assert_eq!(
            deposit(&mut account, Decimal::ZERO).unwrap_err(),
            LedgerError::InvalidAmount
        );
        assert_eq!(
            deposit(&mut account, dec!(-5)).unwrap_err(),
            LedgerError::InvalidAmount
        );
        assert_eq!(account.cash_balance, Decimal::ZERO);
    }

    #[test]
    fn test_withdraw_decreases_balance() {
        let mut account = account();
        deposit(&mut account, dec!(1000)).unwrap();
        withdraw(&mut account, dec!(400)).unwrap();
        assert_eq!(account.cash_balance, dec!(600));
        assert_eq!(account.total_withdrawn, dec!(400));
        assert_eq!(account.total_deposited, dec!(1000));
    }

    #[test]
    fn test_withdraw_more_than_balance_fails() {
        let mut account = account();
        deposit(&mut account, dec!(100)).unwrap();
        let err = withdraw(&mut account, dec!(101)).unwrap_err();
        assert_eq!(
            err,
            LedgerError::InsufficientFunds {
                required: dec!(101),
                available: dec!(100),
            }
        );
        // State unchanged on failure
        assert_eq!(account.cash_balance, dec!(100));
        assert_eq!(account.total_withdrawn, Decimal::ZERO);
    }

    #[test]
    fn test_balance_equals_deposits_minus_withdrawals() {
        let mut account = account();
        deposit(&mut account, dec!(5000)).unwrap();
        withdraw(&mut account, dec!(1200)).unwrap();
        deposit(&mut account, dec!(300.50)).unwrap();
        withdraw(&mut account, dec!(99.25)).unwrap();

        assert_eq!(
            account.cash_balance,
            account.total_deposited - account.total_withdrawn
        );
        assert_eq!(account.cash_balance, dec!(4001.25));
    }
}
