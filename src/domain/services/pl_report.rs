//! P&L aggregator - account-wide profit and loss report
//!
//! Realized P&L is not accumulated independently: it falls out of the
//! identity `total = total_account_value - net_deposits` and
//! `realized = total - unrealized`, which holds exactly by construction.

use crate::domain::entities::account::Account;
use crate::domain::services::position_tracker::Position;
use crate::domain::services::valuation::{self, Valuation};
use crate::domain::value_objects::price::Price;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

/// Per-ticker slice of the report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionValuation {
    pub ticker: String,
    pub quantity: Decimal,
    pub average_cost: Decimal,
    pub current_price: Option<Decimal>,
    pub market_value: Decimal,
    pub unrealized_pl: Decimal,
    pub price_available: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlReport {
    pub cash_balance: Decimal,
    pub portfolio_value: Decimal,
    pub total_account_value: Decimal,
    pub net_deposits: Decimal,
    pub total_pl: Decimal,
    pub total_pl_pct: Decimal,
    pub unrealized_pl: Decimal,
    pub realized_pl: Decimal,
    pub positions: Vec<PositionValuation>,
}

/// Compose the account-wide report from open positions and their prices.
///
/// Positions with zero quantity are skipped. `total_pl_pct` is a defined
/// zero when nothing has been net-deposited.
pub fn summarize(account: &Account, positions_with_prices: &[(Position, Option<Price>)]) -> PlReport {
    let mut portfolio_value = Decimal::ZERO;
    let mut open_cost_basis = Decimal::ZERO;
    let mut valuations = Vec::new();

    for (position, current_price) in positions_with_prices {
        if position.quantity <= Decimal::ZERO {
            continue;
        }

        let Valuation {
            market_value,
            unrealized_pl,
            price_available,
        } = valuation::value(position, *current_price);

        portfolio_value += market_value;
        open_cost_basis += position.total_cost;

        valuations.push(PositionValuation {
            ticker: position.ticker.clone(),
            quantity: position.quantity,
            average_cost: position.average_cost().unwrap_or(Decimal::ZERO),
            current_price: current_price.map(|p| p.value()),
            market_value,
            unrealized_pl,
            price_available,
        });
    }

    let total_account_value = account.cash_balance + portfolio_value;
    let net_deposits = account.net_deposits();
    let total_pl = total_account_value - net_deposits;
    let total_pl_pct = if net_deposits > Decimal::ZERO {
        total_pl / net_deposits * dec!(100)
    } else {
        Decimal::ZERO
    };
    let unrealized_pl = portfolio_value - open_cost_basis;

    PlReport {
        cash_balance: account.cash_balance,
        portfolio_value,
        total_account_value,
        net_deposits,
        total_pl,
        total_pl_pct,
        unrealized_pl,
        realized_pl: total_pl - unrealized_pl,
        positions: valuations,
    }
}
