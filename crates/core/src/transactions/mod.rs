//! Transactions module - ledger events and their wire form.

mod transactions_constants;
mod transactions_model;


pub use transactions_constants::*;
pub use transactions_model::{normalize_ticker, Transaction, TransactionRecord, TransactionType};
