//! Database Repository
//!
//! Data access layer for accounts, trades, and cash entries.
//!
//! Reads go through the pool. Writes that must commit together (an account
//! update plus its event row) take a `&mut SqliteConnection` so the service
//! can group them in one transaction.

use super::models::*;
use super::{DatabaseError, DbPool};
use crate::domain::entities::account::Account;
use crate::domain::entities::cash_entry::{CashEntry, CashEntryKind};
use crate::domain::entities::trade::{Trade, TradeSide};
use rust_decimal::Decimal;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection};
use tracing::{debug, error};

fn get_decimal(row: &SqliteRow, column: &str) -> Result<Decimal, DatabaseError> {
    let raw: String = row.get(column);
    raw.parse().map_err(|e| {
        DatabaseError::QueryError(format!("Invalid decimal in column {}: {}", column, e))
    })
}

fn account_from_row(row: &SqliteRow) -> Result<Account, DatabaseError> {
    Ok(Account {
        id: row.get("id"),
        cash_balance: get_decimal(row, "cash_balance")?,
        total_deposited: get_decimal(row, "total_deposited")?,
        total_withdrawn: get_decimal(row, "total_withdrawn")?,
        paper_trading_enabled: row.get("paper_trading_enabled"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

fn trade_from_row(row: &SqliteRow) -> Result<Trade, DatabaseError> {
    let side: String = row.get("side");
    Ok(Trade {
        id: row.get("id"),
        account_id: row.get("account_id"),
        ticker: row.get("ticker"),
        side: side
            .parse::<TradeSide>()
            .map_err(DatabaseError::QueryError)?,
        quantity: get_decimal(row, "quantity")?,
        price: get_decimal(row, "price")?,
        executed_at: row.get("executed_at"),
    })
}

fn cash_entry_from_row(row: &SqliteRow) -> Result<CashEntry, DatabaseError> {
    let kind: String = row.get("kind");
    Ok(CashEntry {
        id: row.get("id"),
        account_id: row.get("account_id"),
        kind: kind
            .parse::<CashEntryKind>()
            .map_err(DatabaseError::QueryError)?,
        amount: get_decimal(row, "amount")?,
        note: row.get("note"),
        recorded_at: row.get("recorded_at"),
    })
}

/// Account repository
pub struct AccountRepository {
    pool: DbPool,
}

impl AccountRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Create a new account row
    pub async fn create(&self, account: &Account) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO accounts (
                id, cash_balance, total_deposited, total_withdrawn,
                paper_trading_enabled, created_at, updated_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&account.id)
        .bind(account.cash_balance.to_string())
        .bind(account.total_deposited.to_string())
        .bind(account.total_withdrawn.to_string())
        .bind(account.paper_trading_enabled)
        .bind(account.created_at)
        .bind(account.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("Failed to create account {}: {}", account.id, e);
            DatabaseError::QueryError(format!("Failed to create account: {}", e))
        })?;

        debug!("Created account: {}", account.id);
        Ok(())
    }

    /// Get account by ID
    pub async fn get(&self, id: &str) -> Result<Option<Account>, DatabaseError> {
        let row = sqlx::query("SELECT * FROM accounts WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!("Failed to get account {}: {}", id, e);
                DatabaseError::QueryError(format!("Failed to get account: {}", e))
            })?;

        row.as_ref().map(account_from_row).transpose()
    }

    /// Persist account balances and mode inside an open transaction
    pub async fn update_state(
        conn: &mut SqliteConnection,
        account: &Account,
    ) -> Result<(), DatabaseError> {
        let rows_affected = sqlx::query(
            r#"
            UPDATE accounts
            SET cash_balance = ?1, total_deposited = ?2, total_withdrawn = ?3,
                paper_trading_enabled = ?4, updated_at = ?5
            WHERE id = ?6
            "#,
        )
        .bind(account.cash_balance.to_string())
        .bind(account.total_deposited.to_string())
        .bind(account.total_withdrawn.to_string())
        .bind(account.paper_trading_enabled)
        .bind(account.updated_at)
        .bind(&account.id)
        .execute(conn)
        .await
        .map_err(|e| {
            error!("Failed to update account {}: {}", account.id, e);
            DatabaseError::QueryError(format!("Failed to update account: {}", e))
        })?
        .rows_affected();

        if rows_affected == 0 {
            return Err(DatabaseError::QueryError(format!(
                "Account not found: {}",
                account.id
            )));
        }

        debug!("Updated account: {}", account.id);
        Ok(())
    }
}

/// Trade repository
pub struct TradeRepository {
    pool: DbPool,
}

impl TradeRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Insert a trade inside an open transaction
    pub async fn insert(
        conn: &mut SqliteConnection,
        trade: CreateTrade,
    ) -> Result<Trade, DatabaseError> {
        let row = sqlx::query(
            r#"
            INSERT INTO trades (account_id, ticker, side, quantity, price, executed_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            RETURNING *
            "#,
        )
        .bind(&trade.account_id)
        .bind(&trade.ticker)
        .bind(trade.side.to_string())
        .bind(trade.quantity.to_string())
        .bind(trade.price.to_string())
        .bind(trade.executed_at)
        .fetch_one(conn)
        .await
        .map_err(|e| {
            error!("Failed to create trade for {}: {}", trade.account_id, e);
            DatabaseError::QueryError(format!("Failed to create trade: {}", e))
        })?;

        let record = trade_from_row(&row)?;
        debug!("Created trade: {} {} {}", record.id, record.side, record.ticker);
        Ok(record)
    }

    /// All trades for an account in replay order (chronological, serial id
    /// breaking timestamp ties)
    pub async fn for_account(&self, account_id: &str) -> Result<Vec<Trade>, DatabaseError> {
        let rows = sqlx::query(
            "SELECT * FROM trades WHERE account_id = ?1 ORDER BY executed_at ASC, id ASC",
        )
        .bind(account_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Failed to get trades for {}: {}", account_id, e);
            DatabaseError::QueryError(format!("Failed to get trades: {}", e))
        })?;

        rows.iter().map(trade_from_row).collect()
    }

    /// Trade history, newest first
    pub async fn history(&self, account_id: &str) -> Result<Vec<Trade>, DatabaseError> {
        let rows = sqlx::query(
            "SELECT * FROM trades WHERE account_id = ?1 ORDER BY executed_at DESC, id DESC",
        )
        .bind(account_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Failed to get trade history for {}: {}", account_id, e);
            DatabaseError::QueryError(format!("Failed to get trade history: {}", e))
        })?;

        rows.iter().map(trade_from_row).collect()
    }

    /// Delete all trades for an account inside an open transaction
    pub async fn delete_for_account(
        conn: &mut SqliteConnection,
        account_id: &str,
    ) -> Result<u64, DatabaseError> {
        let rows_affected = sqlx::query("DELETE FROM trades WHERE account_id = ?1")
            .bind(account_id)
            .execute(conn)
            .await
            .map_err(|e| {
                error!("Failed to delete trades for {}: {}", account_id, e);
                DatabaseError::QueryError(format!("Failed to delete trades: {}", e))
            })?
            .rows_affected();

        debug!("Deleted {} trades for account {}", rows_affected, account_id);
        Ok(rows_affected)
    }
}

/// Cash entry repository
pub struct CashEntryRepository {
    pool: DbPool,
}

impl CashEntryRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Insert a cash entry inside an open transaction
    pub async fn insert(
        conn: &mut SqliteConnection,
        entry: CreateCashEntry,
    ) -> Result<CashEntry, DatabaseError> {
        let row = sqlx::query(
            r#"
            INSERT INTO cash_entries (account_id, kind, amount, note, recorded_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            RETURNING *
            "#,
        )
        .bind(&entry.account_id)
        .bind(entry.kind.to_string())
        .bind(entry.amount.to_string())
        .bind(&entry.note)
        .bind(entry.recorded_at)
        .fetch_one(conn)
        .await
        .map_err(|e| {
            error!("Failed to create cash entry for {}: {}", entry.account_id, e);
            DatabaseError::QueryError(format!("Failed to create cash entry: {}", e))
        })?;

        let record = cash_entry_from_row(&row)?;
        debug!("Created cash entry: {} {}", record.id, record.kind);
        Ok(record)
    }

    /// Cash history, newest first
    pub async fn history(&self, account_id: &str) -> Result<Vec<CashEntry>, DatabaseError> {
        let rows = sqlx::query(
            "SELECT * FROM cash_entries WHERE account_id = ?1 ORDER BY recorded_at DESC, id DESC",
        )
        .bind(account_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Failed to get cash history for {}: {}", account_id, e);
            DatabaseError::QueryError(format!("Failed to get cash history: {}", e))
        })?;

        rows.iter().map(cash_entry_from_row).collect()
    }

    /// Delete all cash entries for an account inside an open transaction
    pub async fn delete_for_account(
        conn: &mut SqliteConnection,
        account_id: &str,
    ) -> Result<u64, DatabaseError> {
        let rows_affected = sqlx::query("DELETE FROM cash_entries WHERE account_id = ?1")
            .bind(account_id)
            .execute(conn)
            .await
            .map_err(|e| {
                error!("Failed to delete cash entries for {}: {}", account_id, e);
                DatabaseError::QueryError(format!("Failed to delete cash entries: {}", e))
            })?
            .rows_affected();

        debug!(
            "Deleted {} cash entries for account {}",
            rows_affected, account_id
        );
        Ok(rows_affected)
    }
}
