use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::errors::{Error, Result};
use crate::transactions::normalize_ticker;

/// Registry entry for a ticker. Informational only: the ledger accepts
/// transactions for tickers that were never registered.
///
/// Equality and hashing use the ticker alone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stock {
    ticker: String,
    #[serde(default)]
    name: String,
}

impl Stock {
    /// Creates a stock entry. A blank name falls back to the ticker.
    pub fn new(ticker: &str, name: &str) -> Result<Self> {
        let ticker = normalize_ticker(ticker);
        if ticker.is_empty() {
            return Err(Error::InvalidTransaction(
                "Ticker must not be empty".to_string(),
            ));
        }
        let name = match name.trim() {
            "" => ticker.clone(),
            trimmed => trimmed.to_string(),
        };
        Ok(Self { ticker, name })
    }

    /// Entry registered implicitly by the first transaction for a ticker.
    pub(crate) fn placeholder(ticker: &str) -> Self {
        Self {
            ticker: ticker.to_string(),
            name: ticker.to_string(),
        }
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Re-applies the construction rules to an entry read from storage.
    pub(crate) fn normalized(self) -> Result<Self> {
        Stock::new(&self.ticker, &self.name)
    }
}

impl PartialEq for Stock {
    fn eq(&self, other: &Self) -> bool {
        self.ticker == other.ticker
    }
}

impl Eq for Stock {}

impl Hash for Stock {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.ticker.hash(state);
    }
}

impl fmt::Display for Stock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.ticker, self.name)
    }
}
