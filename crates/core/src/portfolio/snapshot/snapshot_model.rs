use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::constants::DEFAULT_PORTFOLIO_NAME;
use crate::errors::{Error, Result};
use crate::stocks::Stock;
use crate::transactions::Transaction;

fn default_portfolio_name() -> String {
    DEFAULT_PORTFOLIO_NAME.to_string()
}

/// Full serialized state of a portfolio: name, ticker registry and
/// transactions in insertion order. Derived views are never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSnapshot {
    #[serde(default = "default_portfolio_name")]
    pub name: String,
    #[serde(default)]
    pub stocks: BTreeMap<String, Stock>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

impl Default for PortfolioSnapshot {
    fn default() -> Self {
        Self {
            name: default_portfolio_name(),
            stocks: BTreeMap::new(),
            transactions: Vec::new(),
        }
    }
}

impl PortfolioSnapshot {
    /// Parses a snapshot document. Any structural or field error is reported
    /// as [`Error::MalformedSnapshot`].
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::MalformedSnapshot(e.to_string()))
    }

    /// Pretty-printed JSON with two-space indentation.
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::Serialization(e.to_string()))
    }
}
