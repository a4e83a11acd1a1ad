use std::path::PathBuf;

use clap::ValueEnum;
use stockfolio_core::constants::DEFAULT_PORTFOLIO_NAME;

use crate::cli::{Cli, PriceSource, StoreKind};
use crate::error::CliError;

const DEFAULT_DATA_DIR: &str = "data";

/// Runtime settings resolved from the environment (and `.env`), then
/// overridden by command-line flags.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub store: StoreKind,
    pub db_path: Option<PathBuf>,
    pub portfolio_name: String,
    pub price_source: PriceSource,
    pub manual_prices: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self, CliError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, CliError> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let store = match var("STOCKFOLIO_STORE") {
            Some(value) => parse_enum::<StoreKind>("STOCKFOLIO_STORE", &value)?,
            None => StoreKind::Json,
        };
        let price_source = match var("STOCKFOLIO_PRICE_SOURCE") {
            Some(value) => parse_enum::<PriceSource>("STOCKFOLIO_PRICE_SOURCE", &value)?,
            None => PriceSource::Yahoo,
        };

        Ok(Self {
            data_dir: var("STOCKFOLIO_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
            store,
            db_path: var("STOCKFOLIO_DB_PATH").map(PathBuf::from),
            portfolio_name: var("STOCKFOLIO_PORTFOLIO_NAME")
                .unwrap_or_else(|| DEFAULT_PORTFOLIO_NAME.to_string()),
            price_source,
            manual_prices: var("STOCKFOLIO_MANUAL_PRICES").map(PathBuf::from),
        })
    }

    pub fn with_overrides(mut self, cli: &Cli) -> Self {
        if let Some(data_dir) = &cli.data_dir {
            self.data_dir = data_dir.clone();
        }
        if let Some(store) = cli.store {
            self.store = store;
        }
        if let Some(prices) = cli.prices {
            self.price_source = prices;
        }
        if let Some(price_file) = &cli.price_file {
            self.manual_prices = Some(price_file.clone());
        }
        self
    }
}

fn parse_enum<T: ValueEnum>(key: &str, value: &str) -> Result<T, CliError> {
    T::from_str(value.trim(), true)
        .map_err(|_| CliError::Config(format!("invalid {key} value '{value}'")))
}
