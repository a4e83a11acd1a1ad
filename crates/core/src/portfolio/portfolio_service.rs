use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{debug, error, info};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};
use tokio::sync::Mutex;

use crate::errors::Result;
use crate::portfolio::ledger::Holding;
use crate::portfolio::portfolio_model::{Portfolio, PortfolioSummary};
use crate::portfolio::portfolio_traits::{PortfolioRepositoryTrait, PortfolioServiceTrait};
use crate::stocks::Stock;
use crate::transactions::{Transaction, TransactionType};

/// Loads the stored portfolio.
///
/// Returns `None` when nothing is stored or the stored data cannot be read;
/// the cause is logged.
pub fn load_portfolio(repository: &dyn PortfolioRepositoryTrait) -> Option<Portfolio> {
    match repository.load_snapshot() {
        Ok(Some(snapshot)) => match Portfolio::from_snapshot(snapshot) {
            Ok(portfolio) => Some(portfolio),
            Err(e) => {
                error!("Stored portfolio could not be rebuilt: {}", e);
                None
            }
        },
        Ok(None) => {
            debug!("No stored portfolio found");
            None
        }
        Err(e) => {
            error!("Failed to load portfolio: {}", e);
            None
        }
    }
}

/// Owns one portfolio and keeps it in sync with a repository.
///
/// Reads replay the in-memory ledger. Writes are serialized by `write_gate`,
/// applied to a copy, saved, and only then published.
pub struct PortfolioService {
    repository: Arc<dyn PortfolioRepositoryTrait>,
    portfolio: RwLock<Portfolio>,
    write_gate: Mutex<()>,
}

impl PortfolioService {
    pub fn new(repository: Arc<dyn PortfolioRepositoryTrait>, portfolio: Portfolio) -> Self {
        Self {
            repository,
            portfolio: RwLock::new(portfolio),
            write_gate: Mutex::new(()),
        }
    }

    /// Loads the stored portfolio, or starts an empty one named `default_name`
    /// when nothing usable is stored.
    pub fn load_or_create(
        repository: Arc<dyn PortfolioRepositoryTrait>,
        default_name: &str,
    ) -> Self {
        let portfolio = load_portfolio(repository.as_ref()).unwrap_or_else(|| {
            info!("Starting new portfolio '{}'", default_name);
            Portfolio::new(default_name)
        });
        Self::new(repository, portfolio)
    }

    fn read(&self) -> RwLockReadGuard<'_, Portfolio> {
        self.portfolio.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, portfolio: Portfolio) {
        *self.portfolio.write().unwrap_or_else(PoisonError::into_inner) = portfolio;
    }

    /// Applies `change` to a copy of the portfolio, persists it, then swaps it in.
    async fn mutate<T, F>(&self, change: F) -> Result<T>
    where
        F: FnOnce(&mut Portfolio) -> Result<T> + Send,
        T: Send,
    {
        let _gate = self.write_gate.lock().await;

        let mut next = self.read().clone();
        let output = change(&mut next)?;
        self.repository.save_snapshot(next.to_snapshot()).await?;
        self.publish(next);

        Ok(output)
    }

    async fn record(&self, transaction: Transaction, stock: Option<Stock>) -> Result<Transaction> {
        self.mutate(move |portfolio| {
            if let Some(stock) = stock {
                portfolio.add_stock(stock);
            }
            portfolio.record_transaction(transaction.clone())?;
            Ok(transaction)
        })
        .await
        .inspect(|t| debug!("Recorded {}", t))
    }
}

#[async_trait]
impl PortfolioServiceTrait for PortfolioService {
    fn get_portfolio(&self) -> Portfolio {
        self.read().clone()
    }

    fn get_holdings(&self) -> BTreeMap<String, Holding> {
        self.read().get_holdings()
    }

    fn get_summary(&self) -> PortfolioSummary {
        self.read().get_portfolio_summary()
    }

    fn get_transactions(&self) -> Vec<Transaction> {
        self.read().transactions().to_vec()
    }

    fn get_transactions_by_ticker(&self, ticker: &str) -> Vec<Transaction> {
        self.read()
            .get_transactions_by_ticker(ticker)
            .into_iter()
            .cloned()
            .collect()
    }

    fn get_realized_gains(&self) -> Decimal {
        self.read().get_realized_gains()
    }

    fn get_dividend_income(&self) -> Decimal {
        self.read().get_dividend_income()
    }

    fn get_oversold_tickers(&self) -> Vec<String> {
        self.read().get_oversold_tickers()
    }

    async fn record_buy(
        &self,
        ticker: &str,
        quantity: Decimal,
        price: Decimal,
        date: Option<DateTime<Utc>>,
        name: Option<String>,
    ) -> Result<Transaction> {
        let transaction =
            Transaction::with_details(ticker, TransactionType::Buy, quantity, price, date, None)?;
        let stock = match name {
            Some(name) => Some(Stock::new(transaction.ticker(), &name)?),
            None => None,
        };
        self.record(transaction, stock).await
    }

    async fn record_sell(
        &self,
        ticker: &str,
        quantity: Decimal,
        price: Decimal,
        date: Option<DateTime<Utc>>,
    ) -> Result<Transaction> {
        let transaction =
            Transaction::with_details(ticker, TransactionType::Sell, quantity, price, date, None)?;
        self.record(transaction, None).await
    }

    async fn record_dividend(
        &self,
        ticker: &str,
        amount: Decimal,
        date: Option<DateTime<Utc>>,
    ) -> Result<Transaction> {
        let transaction = Transaction::dividend(ticker, amount, date)?;
        self.record(transaction, None).await
    }

    async fn add_stock(&self, stock: Stock) -> Result<()> {
        self.mutate(move |portfolio| {
            portfolio.add_stock(stock);
            Ok(())
        })
        .await
    }

    async fn clear(&self) -> Result<()> {
        let _gate = self.write_gate.lock().await;

        self.repository.clear_snapshot().await?;
        let name = self.read().name().to_string();
        info!("Cleared portfolio '{}'", name);
        self.publish(Portfolio::new(name));
        Ok(())
    }
}
