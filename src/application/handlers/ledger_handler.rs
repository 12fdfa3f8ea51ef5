//! HTTP handlers for the ledger service
//!
//! Thin delegation only: requests are deserialized, handed to
//! `LedgerService`, and errors mapped to status codes. No accounting logic
//! lives here.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use crate::application::services::ledger_service::{LedgerService, TradeOutcome, TradeRequest};
use crate::domain::entities::account::Account;
use crate::domain::entities::cash_entry::{CashEntry, CashEntryKind};
use crate::domain::entities::trade::Trade;
use crate::domain::errors::LedgerError;
use crate::domain::services::pl_report::PlReport;
use crate::domain::services::position_tracker::Position;
use crate::infrastructure::quote_board::QuoteBoard;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<LedgerService>,
    pub quotes: Arc<QuoteBoard>,
    pub default_initial_deposit: Decimal,
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

type HandlerError = (StatusCode, Json<ErrorResponse>);

fn map_error(e: LedgerError) -> HandlerError {
    let status = match &e {
        LedgerError::InvalidAmount
        | LedgerError::InsufficientFunds { .. }
        | LedgerError::InsufficientShares { .. }
        | LedgerError::AlreadyInState(_) => StatusCode::BAD_REQUEST,
        LedgerError::AccountNotFound(_) => StatusCode::NOT_FOUND,
        LedgerError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (
        status,
        Json(ErrorResponse {
            error: e.to_string(),
        }),
    )
}

#[derive(Debug, Deserialize)]
pub struct EnableRequest {
    pub initial_deposit: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
pub struct CashRequest {
    pub kind: CashEntryKind,
    pub amount: Decimal,
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct QuoteRequest {
    pub price: Decimal,
}

pub async fn create_account(
    State(state): State<AppState>,
    Path(account_id): Path<String>,
) -> Result<(StatusCode, Json<Account>), HandlerError> {
    let account = state
        .ledger
        .create_account(&account_id)
        .await
        .map_err(map_error)?;
    Ok((StatusCode::CREATED, Json(account)))
}

pub async fn enable_paper_trading(
    State(state): State<AppState>,
    Path(account_id): Path<String>,
    Json(body): Json<EnableRequest>,
) -> Result<Json<Account>, HandlerError> {
    let deposit = body
        .initial_deposit
        .unwrap_or(state.default_initial_deposit);
    let account = state
        .ledger
        .enable_paper_trading(&account_id, deposit)
        .await
        .map_err(map_error)?;
    Ok(Json(account))
}

pub async fn get_status(
    State(state): State<AppState>,
    Path(account_id): Path<String>,
) -> Result<Json<Account>, HandlerError> {
    let account = state
        .ledger
        .get_account(&account_id)
        .await
        .map_err(map_error)?;
    Ok(Json(account))
}

pub async fn manage_cash(
    State(state): State<AppState>,
    Path(account_id): Path<String>,
    Json(body): Json<CashRequest>,
) -> Result<Json<CashEntry>, HandlerError> {
    let entry = state
        .ledger
        .process_cash(&account_id, body.kind, body.amount, body.note)
        .await
        .map_err(map_error)?;
    Ok(Json(entry))
}

pub async fn cash_history(
    State(state): State<AppState>,
    Path(account_id): Path<String>,
) -> Result<Json<Vec<CashEntry>>, HandlerError> {
    let entries = state
        .ledger
        .cash_history(&account_id)
        .await
        .map_err(map_error)?;
    Ok(Json(entries))
}

pub async fn record_trade(
    State(state): State<AppState>,
    Path(account_id): Path<String>,
    Json(body): Json<TradeRequest>,
) -> Result<(StatusCode, Json<TradeOutcome>), HandlerError> {
    let outcome = state
        .ledger
        .process_trade(&account_id, body)
        .await
        .map_err(map_error)?;
    Ok((StatusCode::CREATED, Json(outcome)))
}

pub async fn trade_history(
    State(state): State<AppState>,
    Path(account_id): Path<String>,
) -> Result<Json<Vec<Trade>>, HandlerError> {
    let trades = state
        .ledger
        .trade_history(&account_id)
        .await
        .map_err(map_error)?;
    Ok(Json(trades))
}

pub async fn get_positions(
    State(state): State<AppState>,
    Path(account_id): Path<String>,
) -> Result<Json<Vec<Position>>, HandlerError> {
    let positions = state
        .ledger
        .get_positions(&account_id)
        .await
        .map_err(map_error)?;
    Ok(Json(positions))
}

pub async fn get_profit_loss(
    State(state): State<AppState>,
    Path(account_id): Path<String>,
) -> Result<Json<PlReport>, HandlerError> {
    let report = state
        .ledger
        .get_pl_report(&account_id, state.quotes.as_ref())
        .await
        .map_err(map_error)?;
    Ok(Json(report))
}

pub async fn reset_account(
    State(state): State<AppState>,
    Path(account_id): Path<String>,
    Json(body): Json<EnableRequest>,
) -> Result<Json<Account>, HandlerError> {
    let deposit = body
        .initial_deposit
        .unwrap_or(state.default_initial_deposit);
    let account = state
        .ledger
        .reset_account(&account_id, deposit)
        .await
        .map_err(map_error)?;
    Ok(Json(account))
}

pub async fn publish_quote(
    State(state): State<AppState>,
    Path(ticker): Path<String>,
    Json(body): Json<QuoteRequest>,
) -> Result<Json<HashMap<String, serde_json::Value>>, HandlerError> {
    state
        .quotes
        .publish_raw(&ticker, body.price)
        .await
        .map_err(map_error)?;

    let mut response = HashMap::new();
    response.insert(
        "ticker".to_string(),
        serde_json::json!(ticker.to_uppercase()),
    );
    response.insert("price".to_string(), serde_json::json!(body.price));
    Ok(Json(response))
}

pub async fn health_check() -> Json<HashMap<String, serde_json::Value>> {
    let mut response = HashMap::new();
    response.insert("status".to_string(), serde_json::json!("running"));
    Json(response)
}
