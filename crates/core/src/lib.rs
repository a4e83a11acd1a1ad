//! Stockfolio Core - Ledger entities, services, and traits.
//!
//! This crate contains the accounting rules that turn an append-only list of
//! transactions into holdings, cost basis, realized gains and dividend income.
//! It is storage-agnostic and defines traits that are implemented by the
//! `storage-json` and `storage-sqlite` crates.

pub mod constants;
pub mod errors;
pub mod portfolio;
pub mod stocks;
pub mod transactions;
pub mod utils;

pub use portfolio::*;
pub use stocks::Stock;
pub use transactions::{Transaction, TransactionType};

pub use errors::Error;
pub use errors::Result;
