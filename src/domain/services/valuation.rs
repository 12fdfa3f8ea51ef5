//! Valuation engine - position state plus an injected price
//!
//! Prices arrive as already-resolved inputs; nothing here performs I/O.
//! A missing price degrades the position to a zero valuation with the
//! `price_available` flag cleared, so a portfolio-wide summary still
//! completes for the other tickers.

use crate::domain::services::position_tracker::Position;
use crate::domain::value_objects::price::Price;
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Valuation {
    pub market_value: Decimal,
    pub unrealized_pl: Decimal,
    pub price_available: bool,
}

/// Value a position at `current_price`, if one is available.
pub fn value(position: &Position, current_price: Option<Price>) -> Valuation {
    match current_price {
        Some(price) => {
            let market_value = position.quantity * price.value();
            Valuation {
                market_value,
                unrealized_pl: market_value - position.total_cost,
                price_available: true,
            }
        }
        None => Valuation {
            market_value: Decimal::ZERO,
            unrealized_pl: Decimal::ZERO,
            price_available: false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn position(quantity: Decimal, total_cost: Decimal) -> Position {
        Position {
            ticker: "AAPL".to_string(),
            quantity,
            total_cost,
        }
    }

    #[test]
    fn test_value_with_price() {
        let valuation = value(&position(dec!(6), dec!(600)), Some(Price::new(dec!(120)).unwrap()));
        assert_eq!(valuation.market_value, dec!(720));
        assert_eq!(valuation.unrealized_pl, dec!(120));
        assert!(valuation.price_available);
    }

    #[test]
    fn test_value_with_loss() {
        let valuation = value(&position(dec!(10), dec!(1000)), Some(Price::new(dec!(90)).unwrap()));
        assert_eq!(valuation.market_value, dec!(900));
        assert_eq!(valuation.unrealized_pl, dec!(-100));
    }

    #[test]
    fn test_value_without_price_degrades_to_zero() {
        let valuation = value(&position(dec!(10), dec!(1000)), None);
        assert_eq!(valuation.market_value, Decimal::ZERO);
        assert_eq!(valuation.unrealized_pl, Decimal::ZERO);
        assert!(!valuation.price_available);
    }
}
