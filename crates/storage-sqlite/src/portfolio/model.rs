//! Database models for portfolios.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

use stockfolio_core::errors::{Error, Result};
use stockfolio_core::transactions::{Transaction, TransactionRecord, TransactionType};
use stockfolio_core::Stock;

/// Database model for creating or replacing a portfolio row
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::portfolios)]
pub struct NewPortfolioDB {
    pub id: String,
    pub name: String,
    pub updated_at: NaiveDateTime,
}

#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::portfolio_stocks)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PortfolioStockDB {
    pub portfolio_id: String,
    pub ticker: String,
    pub name: String,
}

impl PortfolioStockDB {
    pub fn from_domain(portfolio_id: &str, stock: &Stock) -> Self {
        Self {
            portfolio_id: portfolio_id.to_string(),
            ticker: stock.ticker().to_string(),
            name: stock.name().to_string(),
        }
    }

    pub fn into_domain(self) -> Result<Stock> {
        Stock::new(&self.ticker, &self.name)
            .map_err(|e| Error::MalformedSnapshot(format!("stock row {}: {}", self.ticker, e)))
    }
}

/// Decimals are stored as TEXT to keep their exact value.
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::portfolio_transactions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PortfolioTransactionDB {
    pub id: String,
    pub portfolio_id: String,
    pub position: i32,
    pub transaction_id: String,
    pub ticker: String,
    pub transaction_type: String,
    pub quantity: String,
    pub price: String,
    pub total_value: String,
    pub transaction_date: NaiveDateTime,
}

fn parse_decimal(field: &str, value: &str) -> Result<Decimal> {
    Decimal::from_str(value)
        .map_err(|e| Error::MalformedSnapshot(format!("invalid {} '{}': {}", field, value, e)))
}

impl PortfolioTransactionDB {
    pub fn from_domain(
        row_id: String,
        portfolio_id: &str,
        position: i32,
        transaction: &Transaction,
    ) -> Self {
        Self {
            id: row_id,
            portfolio_id: portfolio_id.to_string(),
            position,
            transaction_id: transaction.transaction_id().to_string(),
            ticker: transaction.ticker().to_string(),
            transaction_type: transaction.transaction_type().as_str().to_string(),
            quantity: transaction.quantity().to_string(),
            price: transaction.price().to_string(),
            total_value: transaction.total_value().to_string(),
            transaction_date: transaction.date().naive_utc(),
        }
    }

    /// Rebuilds the domain transaction; bad stored values are reported as a
    /// malformed snapshot.
    pub fn into_domain(self) -> Result<Transaction> {
        let transaction_type = TransactionType::from_str(&self.transaction_type)
            .map_err(|e| Error::MalformedSnapshot(e.to_string()))?;

        let record = TransactionRecord {
            transaction_id: Some(self.transaction_id),
            ticker: self.ticker,
            transaction_type,
            quantity: parse_decimal("quantity", &self.quantity)?,
            price: parse_decimal("price", &self.price)?,
            date: self.transaction_date.and_utc(),
            total_value: Some(parse_decimal("total_value", &self.total_value)?),
        };

        Transaction::try_from(record).map_err(|e| Error::MalformedSnapshot(e.to_string()))
    }
}
