//! Manual price provider.
//!
//! Serves prices from a fixed table, typically loaded from a JSON file such as
//! `{ "AAPL": 190.5, "MSFT": 410 }`. Useful offline and in tests.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use tracing::debug;

use crate::errors::MarketDataError;
use crate::models::Quote;
use crate::provider::MarketDataProvider;

const PROVIDER_ID: &str = "MANUAL";
const DEFAULT_CURRENCY: &str = "USD";

/// Fixed-table price provider.
#[derive(Debug, Clone, Default)]
pub struct ManualProvider {
    prices: HashMap<String, Decimal>,
}

impl ManualProvider {
    /// Create a provider from a ticker -> price table. Tickers are uppercased.
    pub fn new(prices: HashMap<String, Decimal>) -> Self {
        let prices = prices
            .into_iter()
            .map(|(symbol, price)| (symbol.trim().to_uppercase(), price))
            .collect();
        Self { prices }
    }

    /// Parse a JSON object of ticker -> price.
    pub fn from_json_str(json: &str) -> Result<Self, MarketDataError> {
        let prices: HashMap<String, Decimal> = serde_json::from_str(json)
            .map_err(|e| MarketDataError::InvalidPriceTable(e.to_string()))?;
        Ok(Self::new(prices))
    }

    /// Load a JSON price table from disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, MarketDataError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            MarketDataError::InvalidPriceTable(format!("{}: {}", path.display(), e))
        })?;
        Self::from_json_str(&contents)
    }

    /// Set or replace the price of a ticker.
    pub fn set_price(&mut self, symbol: &str, price: Decimal) {
        self.prices.insert(symbol.trim().to_uppercase(), price);
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

#[async_trait]
impl MarketDataProvider for ManualProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn priority(&self) -> u8 {
        1
    }

    async fn get_latest_quote(&self, symbol: &str) -> Result<Quote, MarketDataError> {
        let key = symbol.trim().to_uppercase();
        match self.prices.get(&key) {
            Some(price) => {
                debug!("Manual price for {}: {}", key, price);
                Ok(Quote::new(
                    key,
                    Utc::now(),
                    *price,
                    DEFAULT_CURRENCY,
                    PROVIDER_ID,
                ))
            }
            None => Err(MarketDataError::SymbolNotFound(key)),
        }
    }
}
