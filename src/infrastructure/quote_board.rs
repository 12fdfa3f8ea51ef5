//! Quote board - last-known prices pushed in from outside
//!
//! The ledger never fetches market data. Whatever feed the deployment has
//! (a scraper, a manual curl, a test fixture) publishes prices here, and the
//! valuation side reads them through the `PriceSource` seam. An unknown
//! ticker is simply unavailable, which the report handles per position.

use crate::domain::errors::{LedgerError, PriceError};
use crate::domain::repositories::price_source::{PriceResult, PriceSource};
use crate::domain::value_objects::price::Price;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

pub struct QuoteBoard {
    prices: RwLock<HashMap<String, Price>>,
}

impl QuoteBoard {
    pub fn new() -> Self {
        Self {
            prices: RwLock::new(HashMap::new()),
        }
    }

    /// Publish a last-known price for a ticker, replacing any previous one.
    pub async fn publish(&self, ticker: &str, price: Price) {
        let ticker = ticker.trim().to_uppercase();
        debug!("Quote published: {} = {}", ticker, price);
        self.prices.write().await.insert(ticker, price);
    }

    /// Parse-and-publish convenience for callers holding a raw decimal.
    pub async fn publish_raw(
        &self,
        ticker: &str,
        price: rust_decimal::Decimal,
    ) -> Result<(), LedgerError> {
        self.publish(ticker, Price::new(price)?).await;
        Ok(())
    }
}

impl Default for QuoteBoard {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PriceSource for QuoteBoard {
    async fn current_price(&self, ticker: &str) -> PriceResult {
        self.prices
            .read()
            .await
            .get(&ticker.trim().to_uppercase())
            .copied()
            .ok_or_else(|| PriceError::Unavailable(ticker.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_publish_and_lookup() {
        let board = QuoteBoard::new();
        board.publish_raw("aapl", dec!(123.45)).await.unwrap();

        let price = board.current_price("AAPL").await.unwrap();
        assert_eq!(price.value(), dec!(123.45));
    }

    #[tokio::test]
    async fn test_unknown_ticker_unavailable() {
        let board = QuoteBoard::new();
        let err = board.current_price("GOOG").await.unwrap_err();
        assert_eq!(err, PriceError::Unavailable("GOOG".to_string()));
    }

    #[tokio::test]
    async fn test_negative_price_rejected() {
        let board = QuoteBoard::new();
        let err = board.publish_raw("AAPL", dec!(-1)).await.unwrap_err();
        assert_eq!(err, LedgerError::InvalidAmount);
    }

    #[tokio::test]
    async fn test_latest_publish_wins() {
        let board = QuoteBoard::new();
        board.publish_raw("AAPL", dec!(100)).await.unwrap();
        board.publish_raw("AAPL", dec!(105)).await.unwrap();
        assert_eq!(
            board.current_price("AAPL").await.unwrap().value(),
            dec!(105)
        );
    }
}
