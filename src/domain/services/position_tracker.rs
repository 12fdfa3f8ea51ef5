//! Position tracker - average-cost accounting per ticker
//!
//! A position is a derived projection: it has no identity of its own and is
//! materialized by replaying an account's trades in chronological order.
//! Every held share of a ticker carries the same blended average cost, so a
//! sell's realized gain depends on the whole prior buy/sell history, not on
//! any particular lot.

use crate::domain::entities::trade::{Trade, TradeSide};
use crate::domain::errors::LedgerError;
use crate::domain::value_objects::pnl::Pnl;
use crate::domain::value_objects::price::Price;
use crate::domain::value_objects::quantity::Quantity;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

/// Running quantity and cost basis for one ticker.
///
/// `total_cost` is the basis of the shares currently held, not cumulative
/// spend. Invariants: `quantity >= 0`, `total_cost >= 0`, and `total_cost`
/// is exactly zero whenever `quantity` is zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Position {
    pub ticker: String,
    pub quantity: Decimal,
    pub total_cost: Decimal,
}

impl Position {
    pub fn new(ticker: String) -> Self {
        Position {
            ticker,
            quantity: Decimal::ZERO,
            total_cost: Decimal::ZERO,
        }
    }

    /// Blended cost per share, undefined on an empty position.
    pub fn average_cost(&self) -> Option<Decimal> {
        if self.quantity > Decimal::ZERO {
            Some(self.total_cost / self.quantity)
        } else {
            None
        }
    }

    /// Add shares at `price`; quantity and basis both grow.
    pub fn apply_buy(&mut self, quantity: Quantity, price: Price) {
        self.quantity += quantity.value();
        self.total_cost += quantity.value() * price.value();
    }

    /// Remove shares at the running average cost and realize the difference
    /// against `price`.
    ///
    /// Fails with `InsufficientShares` when asked for more than is held;
    /// the position is untouched on failure.
    pub fn apply_sell(&mut self, quantity: Quantity, price: Price) -> Result<Pnl, LedgerError> {
        let qty = quantity.value();
        if qty > self.quantity {
            return Err(LedgerError::InsufficientShares {
                ticker: self.ticker.clone(),
                requested: qty,
                held: self.quantity,
            });
        }

        let avg = if self.quantity > Decimal::ZERO {
            self.total_cost / self.quantity
        } else {
            Decimal::ZERO
        };
        let cost_removed = qty * avg;

        self.total_cost -= cost_removed;
        self.quantity -= qty;

        // An emptied position must carry a basis of exactly zero, so the
        // next buy starts its average from a clean slate.
        if self.quantity == Decimal::ZERO {
            self.total_cost = Decimal::ZERO;
        }

        Ok(Pnl::new(qty * price.value() - cost_removed))
    }

    /// Absorb one trade during replay. Sells beyond the held quantity
    /// saturate at zero instead of failing: the log can contain oversells
    /// recorded while sufficiency checks were disabled, and the projection
    /// must still come out with `quantity >= 0`.
    fn absorb(&mut self, trade: &Trade) {
        match trade.side {
            TradeSide::Buy => {
                self.quantity += trade.quantity;
                self.total_cost += trade.quantity * trade.price;
            }
            TradeSide::Sell => {
                let covered = trade.quantity.min(self.quantity);
                if covered > Decimal::ZERO {
                    let avg = self.total_cost / self.quantity;
                    self.total_cost -= covered * avg;
                    self.quantity -= covered;
                }
                if self.quantity == Decimal::ZERO {
                    self.total_cost = Decimal::ZERO;
                }
            }
        }
    }
}

/// Materialize all positions for an account by replaying its trades.
///
/// `trades` must already be in chronological order (the trade repository
/// returns them that way). Result is sorted by ticker.
pub fn replay_positions(trades: &[Trade]) -> Vec<Position> {
    let mut positions: BTreeMap<String, Position> = BTreeMap::new();
    for trade in trades {
        positions
            .entry(trade.ticker.clone())
            .or_insert_with(|| Position::new(trade.ticker.clone()))
            .absorb(trade);
    }
    positions.into_values().collect()
}

/// Materialize the position for a single ticker.
pub fn replay_position(trades: &[Trade], ticker: &str) -> Position {
    let mut position = Position::new(ticker.to_string());
    for trade in trades.iter().filter(|t| t.ticker == ticker) {
        position.absorb(trade);
    }
    position
}

/// Signed sum of trade quantities for a ticker: buys positive, sells
/// negative. This is the sufficiency check a sell is validated against.
pub fn held_quantity(trades: &[Trade], ticker: &str) -> Decimal {
    trades
        .iter()
        .filter(|t| t.ticker == ticker)
        .map(|t| t.signed_quantity())
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn qty(v: Decimal) -> Quantity {
        Quantity::new(v).unwrap()
    }

    fn price(v: Decimal) -> Price {
        Price::new(v).unwrap()
    }

    fn trade(id: i64, ticker: &str, side: TradeSide, quantity: Decimal, price: Decimal) -> Trade {
        Trade {
            id,
            account_id: "acct-1".to_string(),
            ticker: ticker.to_string(),
            side,
            quantity,
            price,
            executed_at: Utc::now(),
        }
    }

    #[test]
    fn test_apply_buy_accumulates_basis() {
        let mut position = Position::new("AAPL".to_string());
        position.apply_buy(qty(dec!(10)), price(dec!(100)));
        assert_eq!(position.quantity, dec!(10));
        assert_eq!(position.total_cost, dec!(1000));
        assert_eq!(position.average_cost(), Some(dec!(100)));
    }

    #[test]
    fn test_average_cost_blends_across_buys() {
        let mut position = Position::new("AAPL".to_string());
        position.apply_buy(qty(dec!(10)), price(dec!(100)));
        position.apply_buy(qty(dec!(10)), price(dec!(200)));
        assert_eq!(position.quantity, dec!(20));
        assert_eq!(position.total_cost, dec!(3000));
        assert_eq!(position.average_cost(), Some(dec!(150)));
    }

    #[test]
    fn test_apply_sell_realizes_against_average() {
        let mut position = Position::new("AAPL".to_string());
        position.apply_buy(qty(dec!(10)), price(dec!(100)));

        let realized = position.apply_sell(qty(dec!(4)), price(dec!(120))).unwrap();

        // 4 shares at avg 100 cost 400; proceeds 480
        assert_eq!(realized.value(), dec!(80));
        assert_eq!(position.quantity, dec!(6));
        assert_eq!(position.total_cost, dec!(600));
    }

    #[test]
    fn test_apply_sell_more_than_held_fails_unchanged() {
        let mut position = Position::new("AAPL".to_string());
        position.apply_buy(qty(dec!(6)), price(dec!(100)));

        let err = position
            .apply_sell(qty(dec!(10)), price(dec!(120)))
            .unwrap_err();
        assert_eq!(
            err,
            LedgerError::InsufficientShares {
                ticker: "AAPL".to_string(),
                requested: dec!(10),
                held: dec!(6),
            }
        );
        assert_eq!(position.quantity, dec!(6));
        assert_eq!(position.total_cost, dec!(600));
    }

    #[test]
    fn test_basis_forced_to_zero_on_full_exit() {
        let mut position = Position::new("AAPL".to_string());
        position.apply_buy(qty(dec!(3)), price(dec!(33.33)));
        position.apply_sell(qty(dec!(3)), price(dec!(40))).unwrap();

        assert_eq!(position.quantity, Decimal::ZERO);
        assert_eq!(position.total_cost, Decimal::ZERO);
        assert_eq!(position.average_cost(), None);

        // Next buy starts a fresh average
        position.apply_buy(qty(dec!(2)), price(dec!(50)));
        assert_eq!(position.average_cost(), Some(dec!(50)));
    }

    #[test]
    fn test_sell_order_dependence() {
        // Selling between buys changes the blended average and therefore the
        // realized result of later sells.
        let mut early_exit = Position::new("AAPL".to_string());
        early_exit.apply_buy(qty(dec!(10)), price(dec!(100)));
        let first = early_exit
            .apply_sell(qty(dec!(5)), price(dec!(150)))
            .unwrap();
        early_exit.apply_buy(qty(dec!(10)), price(dec!(200)));
        let second = early_exit
            .apply_sell(qty(dec!(5)), price(dec!(150)))
            .unwrap();

        // First sell: avg 100, realized (150-100)*5 = 250.
        assert_eq!(first.value(), dec!(250));
        // Second sell: basis is 5@100 + 10@200 = 2500 over 15 shares.
        let avg = dec!(2500) / dec!(15);
        assert_eq!(second.value(), (dec!(150) - avg) * dec!(5));
    }

    #[test]
    fn test_replay_positions_multiple_tickers() {
        let trades = vec![
            trade(1, "AAPL", TradeSide::Buy, dec!(10), dec!(100)),
            trade(2, "MSFT", TradeSide::Buy, dec!(5), dec!(300)),
            trade(3, "AAPL", TradeSide::Sell, dec!(4), dec!(120)),
        ];

        let positions = replay_positions(&trades);
        assert_eq!(positions.len(), 2);
        assert_eq!(positions[0].ticker, "AAPL");
        assert_eq!(positions[0].quantity, dec!(6));
        assert_eq!(positions[0].total_cost, dec!(600));
        assert_eq!(positions[1].ticker, "MSFT");
        assert_eq!(positions[1].quantity, dec!(5));
        assert_eq!(positions[1].total_cost, dec!(1500));
    }

    #[test]
    fn test_replay_saturates_oversold_log() {
        // A log recorded without sufficiency checks can sell more than held;
        // the projection clamps at zero instead of going negative.
        let trades = vec![
            trade(1, "AAPL", TradeSide::Buy, dec!(5), dec!(100)),
            trade(2, "AAPL", TradeSide::Sell, dec!(8), dec!(110)),
            trade(3, "AAPL", TradeSide::Buy, dec!(2), dec!(90)),
        ];

        let position = replay_position(&trades, "AAPL");
        assert_eq!(position.quantity, dec!(2));
        assert_eq!(position.total_cost, dec!(180));
    }

    #[test]
    fn test_held_quantity_signed_sum() {
        let trades = vec![
            trade(1, "AAPL", TradeSide::Buy, dec!(10), dec!(100)),
            trade(2, "AAPL", TradeSide::Sell, dec!(4), dec!(120)),
            trade(3, "MSFT", TradeSide::Buy, dec!(2), dec!(300)),
        ];

        assert_eq!(held_quantity(&trades, "AAPL"), dec!(6));
        assert_eq!(held_quantity(&trades, "MSFT"), dec!(2));
        assert_eq!(held_quantity(&trades, "GOOG"), Decimal::ZERO);
    }
}
