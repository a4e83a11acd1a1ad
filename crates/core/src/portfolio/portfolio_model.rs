use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::constants::{DEFAULT_PORTFOLIO_NAME, PERCENT_DECIMAL_PRECISION};
use crate::errors::{Error, Result};
use crate::portfolio::ledger::{Holding, LedgerCalculator, LedgerState};
use crate::portfolio::snapshot::PortfolioSnapshot;
use crate::portfolio::valuation::percent_of;
use crate::stocks::Stock;
use crate::transactions::{normalize_ticker, Transaction};
use crate::utils::decimal_format;

/// Named, append-only ledger of transactions plus a registry of known tickers.
///
/// Nothing derived is cached: every query replays the full transaction list.
#[derive(Debug, Clone, PartialEq)]
pub struct Portfolio {
    name: String,
    transactions: Vec<Transaction>,
    stocks: BTreeMap<String, Stock>,
}

impl Default for Portfolio {
    fn default() -> Self {
        Self::new(DEFAULT_PORTFOLIO_NAME)
    }
}

impl Portfolio {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transactions: Vec::new(),
            stocks: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn stocks(&self) -> &BTreeMap<String, Stock> {
        &self.stocks
    }

    /// Appends a transaction without checking it against current holdings.
    ///
    /// The ticker is registered with a placeholder name if it is unknown.
    pub fn add_transaction(&mut self, transaction: Transaction) {
        if !self.stocks.contains_key(transaction.ticker()) {
            self.stocks.insert(
                transaction.ticker().to_string(),
                Stock::placeholder(transaction.ticker()),
            );
        }
        debug!("Appending to '{}': {}", self.name, transaction);
        self.transactions.push(transaction);
    }

    /// Appends a transaction, rejecting a SELL larger than the open quantity
    /// and any transaction that would overflow the running totals.
    pub fn record_transaction(&mut self, transaction: Transaction) -> Result<()> {
        let mut candidate = self.transactions.clone();
        candidate.push(transaction.clone());
        if LedgerCalculator::replay(&candidate).overflowed(transaction.transaction_id()) {
            return Err(Error::InvalidTransaction(format!(
                "{} would overflow the portfolio totals",
                transaction
            )));
        }

        if transaction.is_sell() {
            let available = self.replay().open_quantity(transaction.ticker());
            if transaction.quantity() > available {
                return Err(Error::InsufficientHoldingForSale {
                    ticker: transaction.ticker().to_string(),
                    requested: transaction.quantity(),
                    available: available.max(Decimal::ZERO),
                });
            }
        }
        self.add_transaction(transaction);
        Ok(())
    }

    /// Inserts or replaces a registry entry.
    pub fn add_stock(&mut self, stock: Stock) {
        self.stocks.insert(stock.ticker().to_string(), stock);
    }

    fn replay(&self) -> LedgerState {
        LedgerCalculator::replay(&self.transactions)
    }

    /// Open positions ordered by ticker.
    pub fn get_holdings(&self) -> BTreeMap<String, Holding> {
        self.replay().holdings()
    }

    pub fn get_realized_gains(&self) -> Decimal {
        self.replay().realized_gains
    }

    pub fn get_dividend_income(&self) -> Decimal {
        self.replay().dividend_income
    }

    /// Transactions for one ticker in insertion order. Matching ignores case.
    pub fn get_transactions_by_ticker(&self, ticker: &str) -> Vec<&Transaction> {
        let ticker = normalize_ticker(ticker);
        self.transactions
            .iter()
            .filter(|t| t.ticker() == ticker)
            .collect()
    }

    /// Tickers sold past their open quantity by permissive appends.
    pub fn get_oversold_tickers(&self) -> Vec<String> {
        self.replay().oversold_tickers()
    }

    pub fn get_portfolio_summary(&self) -> PortfolioSummary {
        let state = self.replay();
        let holdings = state.holdings();

        let total_cost_basis = holdings
            .values()
            .fold(Decimal::ZERO, |acc, h| acc.saturating_add(h.total_cost));
        let total_return = state.realized_gains.saturating_add(state.dividend_income);
        let return_pct = percent_of(total_return, total_cost_basis, PERCENT_DECIMAL_PRECISION);

        PortfolioSummary {
            name: self.name.clone(),
            total_holdings: holdings.len(),
            total_cost_basis,
            realized_gains: state.realized_gains,
            dividend_income: state.dividend_income,
            total_transactions: self.transactions.len(),
            total_return,
            return_pct,
            holdings,
        }
    }

    /// Serializable copy of the name, stocks and transactions.
    pub fn to_snapshot(&self) -> PortfolioSnapshot {
        PortfolioSnapshot {
            name: self.name.clone(),
            stocks: self.stocks.clone(),
            transactions: self.transactions.clone(),
        }
    }

    /// Rebuilds a portfolio from a snapshot, keeping transactions verbatim.
    pub fn from_snapshot(snapshot: PortfolioSnapshot) -> Result<Self> {
        let mut stocks = BTreeMap::new();
        for (key, stock) in snapshot.stocks {
            let stock = stock
                .normalized()
                .map_err(|e| Error::MalformedSnapshot(format!("stock '{}': {}", key, e)))?;
            stocks.insert(stock.ticker().to_string(), stock);
        }

        Ok(Self {
            name: snapshot.name,
            transactions: snapshot.transactions,
            stocks,
        })
    }
}

impl fmt::Display for Portfolio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Portfolio '{}' with {} holdings and {} transactions",
            self.name,
            self.get_holdings().len(),
            self.transactions.len()
        )
    }
}

/// Aggregate view of a portfolio at the current end of its ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    pub name: String,
    pub total_holdings: usize,
    #[serde(with = "decimal_format")]
    pub total_cost_basis: Decimal,
    #[serde(with = "decimal_format")]
    pub realized_gains: Decimal,
    #[serde(with = "decimal_format")]
    pub dividend_income: Decimal,
    pub total_transactions: usize,
    #[serde(with = "decimal_format")]
    pub total_return: Decimal,
    /// `None` when the total cost basis is not positive.
    #[serde(with = "decimal_format::option", default)]
    pub return_pct: Option<Decimal>,
    pub holdings: BTreeMap<String, Holding>,
}
