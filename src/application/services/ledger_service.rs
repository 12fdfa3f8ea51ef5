//! Ledger Service
//!
//! The transaction processor: validates and applies buy/sell/deposit/
//! withdrawal events against the persisted account state, one exclusive
//! critical section per account, one database transaction per mutation.
//! Read-side projections (positions, history, P&L report) are computed on
//! demand from the committed trade log and take no lock.

use crate::application::services::account_locks::AccountLocks;
use crate::domain::entities::account::Account;
use crate::domain::entities::cash_entry::{CashEntry, CashEntryKind};
use crate::domain::entities::trade::{Trade, TradeSide};
use crate::domain::errors::LedgerError;
use crate::domain::repositories::price_source::PriceSource;
use crate::domain::services::cash_ledger;
use crate::domain::services::pl_report::{self, PlReport};
use crate::domain::services::position_tracker::{
    held_quantity, replay_position, replay_positions, Position,
};
use crate::domain::value_objects::pnl::Pnl;
use crate::domain::value_objects::price::Price;
use crate::domain::value_objects::quantity::Quantity;
use crate::persistence::models::{CreateCashEntry, CreateTrade};
use crate::persistence::repository::{AccountRepository, CashEntryRepository, TradeRepository};
use crate::persistence::DbPool;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// A trade intent as submitted by the caller.
#[derive(Debug, Clone, Deserialize)]
pub struct TradeRequest {
    pub ticker: String,
    pub side: TradeSide,
    pub quantity: Decimal,
    pub price: Decimal,
    /// Defaults to now; backdated entries are allowed and replay in
    /// timestamp order.
    pub executed_at: Option<DateTime<Utc>>,
}

/// The applied trade plus its immediate cash and P&L effect.
#[derive(Debug, Clone, Serialize)]
pub struct TradeOutcome {
    pub trade: Trade,
    pub cash_balance: Decimal,
    /// Average-cost realized P&L; present only for sells applied with paper
    /// trading enabled.
    pub realized_pl: Option<Pnl>,
}

pub struct LedgerService {
    pool: DbPool,
    accounts: AccountRepository,
    trades: TradeRepository,
    cash_entries: CashEntryRepository,
    locks: AccountLocks,
}

impl LedgerService {
    pub fn new(pool: DbPool) -> Self {
        Self {
            accounts: AccountRepository::new(pool.clone()),
            trades: TradeRepository::new(pool.clone()),
            cash_entries: CashEntryRepository::new(pool.clone()),
            locks: AccountLocks::new(),
            pool,
        }
    }

    async fn load_account(&self, account_id: &str) -> Result<Account, LedgerError> {
        self.accounts
            .get(account_id)
            .await?
            .ok_or_else(|| LedgerError::AccountNotFound(account_id.to_string()))
    }

    fn check_invariants(account: &Account) -> Result<(), LedgerError> {
        account
            .validate()
            .map_err(|e| LedgerError::Database(format!("Account invariant violated: {}", e)))
    }

    /// Register a new account with paper trading disabled.
    pub async fn create_account(&self, account_id: &str) -> Result<Account, LedgerError> {
        let _guard = self.locks.acquire(account_id).await;

        if self.accounts.get(account_id).await?.is_some() {
            return Err(LedgerError::AlreadyInState(format!(
                "Account already exists: {}",
                account_id
            )));
        }

        let account = Account::new(account_id.to_string());
        self.accounts.create(&account).await?;

        info!("Created account {}", account_id);
        Ok(account)
    }

    /// Switch an account into paper trading with an initial deposit.
    pub async fn enable_paper_trading(
        &self,
        account_id: &str,
        initial_deposit: Decimal,
    ) -> Result<Account, LedgerError> {
        if initial_deposit <= Decimal::ZERO {
            return Err(LedgerError::InvalidAmount);
        }

        let _guard = self.locks.acquire(account_id).await;
        let mut account = self.load_account(account_id).await?;

        if account.paper_trading_enabled {
            return Err(LedgerError::AlreadyInState(
                "Paper trading already enabled".to_string(),
            ));
        }

        let now = Utc::now();
        account.paper_trading_enabled = true;
        account.cash_balance = initial_deposit;
        account.total_deposited = initial_deposit;
        account.updated_at = now;
        Self::check_invariants(&account)?;

        let mut tx = self.pool.begin().await.map_err(db_err)?;
        AccountRepository::update_state(&mut tx, &account).await?;
        CashEntryRepository::insert(
            &mut tx,
            CreateCashEntry {
                account_id: account_id.to_string(),
                kind: CashEntryKind::Deposit,
                amount: initial_deposit,
                note: Some("Initial paper trading deposit".to_string()),
                recorded_at: now,
            },
        )
        .await?;
        tx.commit().await.map_err(db_err)?;

        info!(
            "Paper trading enabled for {} with initial deposit {}",
            account_id, initial_deposit
        );
        Ok(account)
    }

    /// Apply a deposit or withdrawal to a paper-trading account.
    pub async fn process_cash(
        &self,
        account_id: &str,
        kind: CashEntryKind,
        amount: Decimal,
        note: Option<String>,
    ) -> Result<CashEntry, LedgerError> {
        let _guard = self.locks.acquire(account_id).await;
        let mut account = self.load_account(account_id).await?;

        if !account.paper_trading_enabled {
            return Err(LedgerError::AlreadyInState(
                "Paper trading not enabled".to_string(),
            ));
        }

        match kind {
            CashEntryKind::Deposit => cash_ledger::deposit(&mut account, amount)?,
            CashEntryKind::Withdrawal => cash_ledger::withdraw(&mut account, amount)?,
        }

        let now = Utc::now();
        account.updated_at = now;
        Self::check_invariants(&account)?;

        let mut tx = self.pool.begin().await.map_err(db_err)?;
        AccountRepository::update_state(&mut tx, &account).await?;
        let entry = CashEntryRepository::insert(
            &mut tx,
            CreateCashEntry {
                account_id: account_id.to_string(),
                kind,
                amount,
                note,
                recorded_at: now,
            },
        )
        .await?;
        tx.commit().await.map_err(db_err)?;

        info!(
            "{} of {} applied to {}: balance now {}",
            kind, amount, account_id, account.cash_balance
        );
        Ok(entry)
    }

    /// Validate and apply one trade.
    ///
    /// With paper trading enabled, buys must be covered by cash and sells by
    /// held shares; the cash balance moves with the trade. With it disabled
    /// the trade is recorded without sufficiency checks or cash effects
    /// (unconstrained tracking mode). Either way the trade row is persisted
    /// only after every validation has passed.
    pub async fn process_trade(
        &self,
        account_id: &str,
        request: TradeRequest,
    ) -> Result<TradeOutcome, LedgerError> {
        let quantity = Quantity::new(request.quantity)?;
        let price = Price::new(request.price)?;
        let ticker = request.ticker.trim().to_uppercase();
        if ticker.is_empty() {
            return Err(LedgerError::InvalidAmount);
        }

        let _guard = self.locks.acquire(account_id).await;
        let mut account = self.load_account(account_id).await?;

        let notional = quantity.value() * price.value();
        let mut realized_pl = None;

        match request.side {
            TradeSide::Buy => {
                if account.paper_trading_enabled {
                    if notional > account.cash_balance {
                        return Err(LedgerError::InsufficientFunds {
                            required: notional,
                            available: account.cash_balance,
                        });
                    }
                    account.cash_balance -= notional;
                }
            }
            TradeSide::Sell => {
                if account.paper_trading_enabled {
                    let log = self.trades.for_account(account_id).await?;
                    let held = held_quantity(&log, &ticker);
                    if quantity.value() > held {
                        return Err(LedgerError::InsufficientShares {
                            ticker,
                            requested: quantity.value(),
                            held,
                        });
                    }
                    let mut position = replay_position(&log, &ticker);
                    realized_pl = Some(position.apply_sell(quantity, price)?);
                    account.cash_balance += notional;
                }
            }
        }

        let executed_at = request.executed_at.unwrap_or_else(Utc::now);
        account.updated_at = Utc::now();
        Self::check_invariants(&account)?;

        let mut tx = self.pool.begin().await.map_err(db_err)?;
        AccountRepository::update_state(&mut tx, &account).await?;
        let trade = TradeRepository::insert(
            &mut tx,
            CreateTrade {
                account_id: account_id.to_string(),
                ticker,
                side: request.side,
                quantity: quantity.value(),
                price: price.value(),
                executed_at,
            },
        )
        .await?;
        tx.commit().await.map_err(db_err)?;

        info!(
            "Applied {} {} {} @ {} for {}: balance {}",
            trade.side, trade.quantity, trade.ticker, trade.price, account_id, account.cash_balance
        );
        Ok(TradeOutcome {
            trade,
            cash_balance: account.cash_balance,
            realized_pl,
        })
    }

    /// Open positions, materialized by replaying the account's trade log.
    pub async fn get_positions(&self, account_id: &str) -> Result<Vec<Position>, LedgerError> {
        self.load_account(account_id).await?;
        let log = self.trades.for_account(account_id).await?;
        Ok(replay_positions(&log)
            .into_iter()
            .filter(|p| p.quantity > Decimal::ZERO)
            .collect())
    }

    /// Account-wide P&L report with per-ticker prices from `prices`.
    ///
    /// A ticker whose lookup fails is valued at zero and flagged; the report
    /// itself always completes.
    pub async fn get_pl_report(
        &self,
        account_id: &str,
        prices: &dyn PriceSource,
    ) -> Result<PlReport, LedgerError> {
        let account = self.load_account(account_id).await?;
        if !account.paper_trading_enabled {
            return Err(LedgerError::AlreadyInState(
                "Paper trading not enabled".to_string(),
            ));
        }

        let log = self.trades.for_account(account_id).await?;
        let mut positions_with_prices = Vec::new();
        for position in replay_positions(&log) {
            if position.quantity <= Decimal::ZERO {
                continue;
            }
            let current_price = match prices.current_price(&position.ticker).await {
                Ok(price) => Some(price),
                Err(e) => {
                    warn!(
                        "Price lookup failed for {} on {}: {}",
                        position.ticker, account_id, e
                    );
                    None
                }
            };
            positions_with_prices.push((position, current_price));
        }

        Ok(pl_report::summarize(&account, &positions_with_prices))
    }

    /// Current account state (mode and balances).
    pub async fn get_account(&self, account_id: &str) -> Result<Account, LedgerError> {
        self.load_account(account_id).await
    }

    /// Cash entries, newest first.
    pub async fn cash_history(&self, account_id: &str) -> Result<Vec<CashEntry>, LedgerError> {
        let account = self.load_account(account_id).await?;
        if !account.paper_trading_enabled {
            return Err(LedgerError::AlreadyInState(
                "Paper trading not enabled".to_string(),
            ));
        }
        Ok(self.cash_entries.history(account_id).await?)
    }

    /// Trades, newest first.
    pub async fn trade_history(&self, account_id: &str) -> Result<Vec<Trade>, LedgerError> {
        self.load_account(account_id).await?;
        Ok(self.trades.history(account_id).await?)
    }

    /// Wipe the account's trades and cash entries and re-enable paper
    /// trading with a fresh initial deposit. Runs as one transaction under
    /// the account lock: a reset never interleaves with a trade.
    pub async fn reset_account(
        &self,
        account_id: &str,
        initial_deposit: Decimal,
    ) -> Result<Account, LedgerError> {
        if initial_deposit <= Decimal::ZERO {
            return Err(LedgerError::InvalidAmount);
        }

        let _guard = self.locks.acquire(account_id).await;
        let mut account = self.load_account(account_id).await?;

        let now = Utc::now();
        account.paper_trading_enabled = true;
        account.cash_balance = initial_deposit;
        account.total_deposited = initial_deposit;
        account.total_withdrawn = Decimal::ZERO;
        account.updated_at = now;

        let mut tx = self.pool.begin().await.map_err(db_err)?;
        TradeRepository::delete_for_account(&mut tx, account_id).await?;
        CashEntryRepository::delete_for_account(&mut tx, account_id).await?;
        AccountRepository::update_state(&mut tx, &account).await?;
        CashEntryRepository::insert(
            &mut tx,
            CreateCashEntry {
                account_id: account_id.to_string(),
                kind: CashEntryKind::Deposit,
                amount: initial_deposit,
                note: Some("Initial paper trading deposit".to_string()),
                recorded_at: now,
            },
        )
        .await?;
        tx.commit().await.map_err(db_err)?;

        info!(
            "Reset account {} with initial deposit {}",
            account_id, initial_deposit
        );
        Ok(account)
    }
}

fn db_err(e: sqlx::Error) -> LedgerError {
    LedgerError::Database(e.to_string())
}
