//! Price Source Trait
//!
//! This module defines the `PriceSource` trait, the seam to the market-data
//! collaborator. The ledger never fetches prices itself; whatever feeds this
//! trait has already resolved them. Keeping the seam here lets tests inject
//! a mock and keeps the accounting core free of I/O.

use crate::domain::errors::PriceError;
use crate::domain::value_objects::price::Price;
use async_trait::async_trait;

/// Common result type for price lookups
pub type PriceResult = Result<Price, PriceError>;

#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Last known price for a ticker, or `PriceError::Unavailable`.
    async fn current_price(&self, ticker: &str) -> PriceResult;
}

#[cfg(test)]
pub mod test_support {
    use super::*;
    use rust_decimal::Decimal;
    use std::collections::HashMap;

    /// Fixed price table for tests.
    pub struct FixedPrices {
        prices: HashMap<String, Decimal>,
    }

    impl FixedPrices {
        pub fn new(prices: &[(&str, Decimal)]) -> Self {
            Self {
                prices: prices
                    .iter()
                    .map(|(ticker, price)| (ticker.to_string(), *price))
                    .collect(),
            }
        }

        pub fn empty() -> Self {
            Self {
                prices: HashMap::new(),
            }
        }
    }

    #[async_trait]
    impl PriceSource for FixedPrices {
        async fn current_price(&self, ticker: &str) -> PriceResult {
            self.prices
                .get(ticker)
                .copied()
                .map(|p| Price::new(p).expect("fixed test prices are non-negative"))
                .ok_or_else(|| PriceError::Unavailable(ticker.to_string()))
        }
    }
}
