//! Core error types for the Stockfolio ledger.
//!
//! This module defines storage-agnostic error types. Storage-specific errors
//! (from Diesel, SQLite, the filesystem) are converted to these types by the
//! storage layer.

use rust_decimal::Decimal;
use thiserror::Error;

pub use stockfolio_market_data::MarketDataError;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the ledger.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid transaction: {0}")]
    InvalidTransaction(String),

    #[error("Malformed portfolio snapshot: {0}")]
    MalformedSnapshot(String),

    #[error("Cannot sell {requested} shares of {ticker}: only {available} held")]
    InsufficientHoldingForSale {
        ticker: String,
        requested: Decimal,
        available: Decimal,
    },

    #[error("Database operation failed: {0}")]
    Database(#[from] DatabaseError),

    #[error("Repository error: {0}")]
    Repository(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Price lookup failed: {0}")]
    MarketData(#[from] MarketDataError),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Storage-agnostic error type for database operations.
///
/// This enum uses `String` for all error details, allowing the storage layer
/// to convert Diesel/SQLite errors into this format.
#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    #[error("Failed to create database pool: {0}")]
    PoolCreationFailed(String),

    #[error("Database query failed: {0}")]
    QueryFailed(String),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    #[error("Internal database error: {0}")]
    Internal(String),
}

impl Error {
    /// True for errors caused by bad user input rather than the environment.
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::InvalidTransaction(_))
    }

    /// True for errors caused by the current ledger state (e.g. over-sell).
    pub fn is_state_conflict(&self) -> bool {
        matches!(self, Error::InsufficientHoldingForSale { .. })
    }
}

// === From implementations for common error types ===

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        if err.is_data() || err.is_syntax() || err.is_eof() {
            Error::MalformedSnapshot(err.to_string())
        } else {
            Error::Serialization(err.to_string())
        }
    }
}
