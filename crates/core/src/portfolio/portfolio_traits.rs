use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::errors::Result;
use crate::portfolio::ledger::Holding;
use crate::portfolio::portfolio_model::{Portfolio, PortfolioSummary};
use crate::portfolio::snapshot::PortfolioSnapshot;
use crate::stocks::Stock;
use crate::transactions::Transaction;

/// Persistence contract implemented by the storage crates.
#[async_trait]
pub trait PortfolioRepositoryTrait: Send + Sync {
    /// `Ok(None)` when nothing has been saved yet. Structural problems in the
    /// stored data surface as `Error::MalformedSnapshot`.
    fn load_snapshot(&self) -> Result<Option<PortfolioSnapshot>>;
    fn snapshot_exists(&self) -> Result<bool>;
    async fn save_snapshot(&self, snapshot: PortfolioSnapshot) -> Result<()>;
    async fn clear_snapshot(&self) -> Result<()>;
}

/// Trait for portfolio service operations
#[async_trait]
pub trait PortfolioServiceTrait: Send + Sync {
    fn get_portfolio(&self) -> Portfolio;
    fn get_holdings(&self) -> BTreeMap<String, Holding>;
    fn get_summary(&self) -> PortfolioSummary;
    fn get_transactions(&self) -> Vec<Transaction>;
    fn get_transactions_by_ticker(&self, ticker: &str) -> Vec<Transaction>;
    fn get_realized_gains(&self) -> Decimal;
    fn get_dividend_income(&self) -> Decimal;
    fn get_oversold_tickers(&self) -> Vec<String>;

    /// Records a BUY. A `name` registers or renames the stock first.
    async fn record_buy(
        &self,
        ticker: &str,
        quantity: Decimal,
        price: Decimal,
        date: Option<DateTime<Utc>>,
        name: Option<String>,
    ) -> Result<Transaction>;

    /// Records a SELL. Fails with `InsufficientHoldingForSale` past the open quantity.
    async fn record_sell(
        &self,
        ticker: &str,
        quantity: Decimal,
        price: Decimal,
        date: Option<DateTime<Utc>>,
    ) -> Result<Transaction>;

    async fn record_dividend(
        &self,
        ticker: &str,
        amount: Decimal,
        date: Option<DateTime<Utc>>,
    ) -> Result<Transaction>;

    async fn add_stock(&self, stock: Stock) -> Result<()>;

    /// Deletes the persisted snapshot and resets to an empty ledger.
    async fn clear(&self) -> Result<()>;
}
