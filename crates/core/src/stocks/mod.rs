//! Stocks module - registry entries for known tickers.

mod stocks_model;

pub use stocks_model::Stock;
