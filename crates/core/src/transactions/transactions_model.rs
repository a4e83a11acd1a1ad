use chrono::{DateTime, Utc};
use log::warn;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::transactions_constants::*;
use crate::constants::DISPLAY_DECIMAL_PRECISION;
use crate::errors::{Error, Result};
use crate::utils::{decimal_format, timestamp_format};

/// Stored totals may drift from `quantity * price` by float noise.
const TOTAL_VALUE_TOLERANCE: Decimal = dec!(0.000001);

/// Trims and uppercases a ticker symbol.
pub fn normalize_ticker(ticker: &str) -> String {
    ticker.trim().to_uppercase()
}

/// Kind of ledger event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    Buy,
    Sell,
    Dividend,
}

impl TransactionType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Buy => TRANSACTION_TYPE_BUY,
            TransactionType::Sell => TRANSACTION_TYPE_SELL,
            TransactionType::Dividend => TRANSACTION_TYPE_DIVIDEND,
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            TRANSACTION_TYPE_BUY => Ok(TransactionType::Buy),
            TRANSACTION_TYPE_SELL => Ok(TransactionType::Sell),
            TRANSACTION_TYPE_DIVIDEND => Ok(TransactionType::Dividend),
            other => Err(Error::InvalidTransaction(format!(
                "Unknown transaction type '{}'",
                other
            ))),
        }
    }
}

/// One immutable ledger event.
///
/// Fields are only reachable through accessors; a `Transaction` never changes
/// after construction. For [`TransactionType::Dividend`] the quantity is always
/// 1 and `price` holds the full dividend amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TransactionRecord", into = "TransactionRecord")]
pub struct Transaction {
    transaction_id: String,
    ticker: String,
    transaction_type: TransactionType,
    quantity: Decimal,
    price: Decimal,
    date: DateTime<Utc>,
}

impl Transaction {
    /// Creates a transaction dated now with a generated id.
    pub fn new(
        ticker: &str,
        transaction_type: TransactionType,
        quantity: Decimal,
        price: Decimal,
    ) -> Result<Self> {
        Self::with_details(ticker, transaction_type, quantity, price, None, None)
    }

    /// Creates a transaction with an explicit date and/or id.
    ///
    /// A missing date defaults to now; a missing or blank id is derived from
    /// the ticker and date as `{TICKER}_{YYYYMMDDHHMMSSffffff}`.
    pub fn with_details(
        ticker: &str,
        transaction_type: TransactionType,
        quantity: Decimal,
        price: Decimal,
        date: Option<DateTime<Utc>>,
        transaction_id: Option<String>,
    ) -> Result<Self> {
        let ticker = normalize_ticker(ticker);
        if ticker.is_empty() {
            return Err(Error::InvalidTransaction(
                "Ticker must not be empty".to_string(),
            ));
        }
        if quantity <= Decimal::ZERO {
            return Err(Error::InvalidTransaction(format!(
                "Quantity must be positive, got {}",
                quantity
            )));
        }
        if price <= Decimal::ZERO {
            return Err(Error::InvalidTransaction(format!(
                "Price must be positive, got {}",
                price
            )));
        }
        if quantity.checked_mul(price).is_none() {
            return Err(Error::InvalidTransaction(format!(
                "Total value of {} x {} is out of range",
                quantity, price
            )));
        }

        let date = date.unwrap_or_else(Utc::now);
        let transaction_id = transaction_id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| Self::generate_id(&ticker, &date));

        Ok(Self {
            transaction_id,
            ticker,
            transaction_type,
            quantity,
            price,
            date,
        })
    }

    /// Builds a DIVIDEND: quantity 1, price = amount.
    pub fn dividend(ticker: &str, amount: Decimal, date: Option<DateTime<Utc>>) -> Result<Self> {
        if amount <= Decimal::ZERO {
            return Err(Error::InvalidTransaction(format!(
                "Dividend amount must be positive, got {}",
                amount
            )));
        }
        Self::with_details(
            ticker,
            TransactionType::Dividend,
            Decimal::from(DIVIDEND_QUANTITY),
            amount,
            date,
            None,
        )
    }

    fn generate_id(ticker: &str, date: &DateTime<Utc>) -> String {
        format!("{}_{}", ticker, date.format(TRANSACTION_ID_TIMESTAMP_FORMAT))
    }

    pub fn transaction_id(&self) -> &str {
        &self.transaction_id
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn transaction_type(&self) -> TransactionType {
        self.transaction_type
    }

    pub fn quantity(&self) -> Decimal {
        self.quantity
    }

    pub fn price(&self) -> Decimal {
        self.price
    }

    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    /// `quantity * price`; construction guarantees the product fits.
    pub fn total_value(&self) -> Decimal {
        self.quantity.saturating_mul(self.price)
    }

    pub fn is_buy(&self) -> bool {
        self.transaction_type == TransactionType::Buy
    }

    pub fn is_sell(&self) -> bool {
        self.transaction_type == TransactionType::Sell
    }

    pub fn is_dividend(&self) -> bool {
        self.transaction_type == TransactionType::Dividend
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let precision = DISPLAY_DECIMAL_PRECISION as usize;
        write!(
            f,
            "{} {} shares of {} @ ${:.*} on {} (Total: ${:.*})",
            self.transaction_type,
            self.quantity.normalize(),
            self.ticker,
            precision,
            self.price.round_dp(DISPLAY_DECIMAL_PRECISION),
            self.date.format("%Y-%m-%d"),
            precision,
            self.total_value().round_dp(DISPLAY_DECIMAL_PRECISION)
        )
    }
}

/// Flat wire form of a [`Transaction`], shared by the snapshot file and the
/// storage backends.
///
/// `transaction_id` is optional on read. `total_value` is always written but
/// recomputed on read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    pub ticker: String,
    pub transaction_type: TransactionType,
    #[serde(with = "decimal_format")]
    pub quantity: Decimal,
    #[serde(with = "decimal_format")]
    pub price: Decimal,
    #[serde(with = "timestamp_format")]
    pub date: DateTime<Utc>,
    #[serde(
        with = "decimal_format::option",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub total_value: Option<Decimal>,
}

impl TryFrom<TransactionRecord> for Transaction {
    type Error = Error;

    fn try_from(record: TransactionRecord) -> Result<Self> {
        let transaction = Transaction::with_details(
            &record.ticker,
            record.transaction_type,
            record.quantity,
            record.price,
            Some(record.date),
            record.transaction_id,
        )?;

        if let Some(stored) = record.total_value {
            let computed = transaction.total_value();
            if stored.saturating_sub(computed).abs() > TOTAL_VALUE_TOLERANCE {
                warn!(
                    "Transaction {} has stored total_value {} but quantity * price is {}; using {}",
                    transaction.transaction_id, stored, computed, computed
                );
            }
        }

        Ok(transaction)
    }
}

impl From<Transaction> for TransactionRecord {
    fn from(transaction: Transaction) -> Self {
        let total_value = Some(transaction.total_value());
        TransactionRecord {
            transaction_id: Some(transaction.transaction_id),
            ticker: transaction.ticker,
            transaction_type: transaction.transaction_type,
            quantity: transaction.quantity,
            price: transaction.price,
            date: transaction.date,
            total_value,
        }
    }
}
