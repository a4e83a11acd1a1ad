//! Command-line arguments for `stockfolio`.
//!
//! | Command | Description |
//! |---------|-------------|
//! | `buy` | Record a purchase |
//! | `sell` | Record a sale against an open position |
//! | `dividend` | Record dividend income |
//! | `add-stock` | Register or rename a stock |
//! | `summary` | Portfolio totals |
//! | `holdings` | Open positions at average cost |
//! | `transactions` | Ledger entries, optionally for one ticker |
//! | `value` | Holdings at latest market prices |
//! | `clear` | Delete the stored portfolio |
//!
//! Global options fall back to `STOCKFOLIO_*` environment variables (see
//! `config.rs`) when not given on the command line.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use stockfolio_core::utils::time_utils::parse_timestamp;

/// Track stock purchases, sales and dividends with weighted-average cost.
#[derive(Debug, Parser)]
#[command(name = "stockfolio", author, version, about)]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Storage backend. Defaults to `STOCKFOLIO_STORE`, then `json`.
    #[arg(long, global = true, value_enum)]
    pub store: Option<StoreKind>,

    /// Data directory. Defaults to `STOCKFOLIO_DATA_DIR`, then `./data`.
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Price source for `value`. Defaults to `STOCKFOLIO_PRICE_SOURCE`, then `yahoo`.
    #[arg(long, global = true, value_enum)]
    pub prices: Option<PriceSource>,

    /// JSON file of `{ "TICKER": price }` used by the manual price source.
    #[arg(long, global = true)]
    pub price_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StoreKind {
    Json,
    Sqlite,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PriceSource {
    Yahoo,
    Manual,
    None,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Record a purchase.
    Buy(BuyArgs),
    /// Record a sale. Rejected when it exceeds the held quantity.
    Sell(TradeArgs),
    /// Record dividend income.
    Dividend(DividendArgs),
    /// Register a stock's display name.
    AddStock(AddStockArgs),
    /// Show portfolio totals.
    Summary,
    /// Show open positions.
    Holdings,
    /// List transactions in insertion order.
    Transactions(TransactionsArgs),
    /// Value open positions at the latest market prices.
    Value,
    /// Delete the stored portfolio.
    Clear(ClearArgs),
}

#[derive(Debug, Args)]
pub struct TradeArgs {
    pub ticker: String,
    pub quantity: Decimal,
    pub price: Decimal,

    /// Trade time (RFC 3339, `YYYY-MM-DDTHH:MM:SS` or `YYYY-MM-DD`). Defaults to now.
    #[arg(long, value_parser = parse_date)]
    pub date: Option<DateTime<Utc>>,
}

#[derive(Debug, Args)]
pub struct BuyArgs {
    #[command(flatten)]
    pub trade: TradeArgs,

    /// Company name to register with the ticker.
    #[arg(long)]
    pub name: Option<String>,
}

#[derive(Debug, Args)]
pub struct DividendArgs {
    pub ticker: String,
    pub amount: Decimal,

    #[arg(long, value_parser = parse_date)]
    pub date: Option<DateTime<Utc>>,
}

#[derive(Debug, Args)]
pub struct AddStockArgs {
    pub ticker: String,
    pub name: String,
}

#[derive(Debug, Args)]
pub struct TransactionsArgs {
    /// Only show transactions for this ticker (case-insensitive).
    #[arg(long)]
    pub ticker: Option<String>,
}

#[derive(Debug, Args)]
pub struct ClearArgs {
    /// Confirm deletion.
    #[arg(long, default_value_t = false)]
    pub yes: bool,
}

fn parse_date(value: &str) -> Result<DateTime<Utc>, String> {
    parse_timestamp(value).ok_or_else(|| format!("unrecognized date '{value}'"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_buy_with_globals() {
        let cli = Cli::try_parse_from([
            "stockfolio",
            "--format",
            "json",
            "buy",
            "aapl",
            "10",
            "150.25",
            "--name",
            "Apple Inc.",
            "--date",
            "2024-01-15",
            "--store",
            "sqlite",
        ])
        .unwrap();

        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.store, Some(StoreKind::Sqlite));
        let Command::Buy(args) = cli.command else {
            panic!("expected buy");
        };
        assert_eq!(args.trade.ticker, "aapl");
        assert_eq!(args.trade.quantity, dec!(10));
        assert_eq!(args.trade.price, dec!(150.25));
        assert_eq!(args.name.as_deref(), Some("Apple Inc."));
        assert_eq!(
            args.trade.date.unwrap().to_rfc3339(),
            "2024-01-15T00:00:00+00:00"
        );
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["stockfolio", "summary"]).unwrap();
        assert_eq!(cli.format, OutputFormat::Table);
        assert!(!cli.pretty);
        assert!(cli.store.is_none());
        assert!(cli.prices.is_none());
        assert!(matches!(cli.command, Command::Summary));
    }

    #[test]
    fn test_rejects_bad_numbers_and_dates() {
        assert!(Cli::try_parse_from(["stockfolio", "sell", "AAPL", "ten", "150"]).is_err());
        assert!(Cli::try_parse_from([
            "stockfolio",
            "dividend",
            "AAPL",
            "1.5",
            "--date",
            "last tuesday"
        ])
        .is_err());
    }

    #[test]
    fn test_transactions_filter_and_clear_flag() {
        let cli =
            Cli::try_parse_from(["stockfolio", "transactions", "--ticker", "msft"]).unwrap();
        let Command::Transactions(args) = cli.command else {
            panic!("expected transactions");
        };
        assert_eq!(args.ticker.as_deref(), Some("msft"));

        let cli = Cli::try_parse_from(["stockfolio", "clear"]).unwrap();
        assert!(matches!(cli.command, Command::Clear(ClearArgs { yes: false })));
    }
}
