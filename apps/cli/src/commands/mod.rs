mod record;
mod report;
mod value;

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use stockfolio_core::{
    Holding, PortfolioRepositoryTrait, PortfolioService, PortfolioServiceTrait, PortfolioSummary,
    PortfolioValuation, Stock, Transaction,
};
use stockfolio_storage_json::JsonFileRepository;
use stockfolio_storage_sqlite::{self as sqlite, SqlitePortfolioRepository};
use tracing::debug;

use crate::cli::{Cli, Command, StoreKind};
use crate::config::Config;
use crate::error::CliError;

/// Result of one command, rendered by `output`.
#[derive(Debug, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum CommandOutput {
    Recorded(Transaction),
    StockAdded(Stock),
    Summary(PortfolioSummary),
    Holdings(BTreeMap<String, Holding>),
    Transactions {
        ticker: Option<String>,
        transactions: Vec<Transaction>,
    },
    Valuation(PortfolioValuation),
    Cleared {
        name: String,
    },
}

pub async fn run(cli: &Cli, config: &Config) -> Result<CommandOutput, CliError> {
    let repository = open_repository(config)?;
    let service = PortfolioService::load_or_create(repository, &config.portfolio_name);
    execute(&cli.command, &service, config).await
}

pub async fn execute(
    command: &Command,
    service: &dyn PortfolioServiceTrait,
    config: &Config,
) -> Result<CommandOutput, CliError> {
    match command {
        Command::Buy(args) => record::buy(service, args).await,
        Command::Sell(args) => record::sell(service, args).await,
        Command::Dividend(args) => record::dividend(service, args).await,
        Command::AddStock(args) => record::add_stock(service, args).await,
        Command::Summary => Ok(report::summary(service)),
        Command::Holdings => Ok(report::holdings(service)),
        Command::Transactions(args) => Ok(report::transactions(service, args)),
        Command::Value => value::run(service, config).await,
        Command::Clear(args) => {
            let name = service.get_portfolio().name().to_string();
            if !args.yes {
                return Err(CliError::ConfirmationRequired(name));
            }
            service.clear().await?;
            Ok(CommandOutput::Cleared { name })
        }
    }
}

fn open_repository(config: &Config) -> Result<Arc<dyn PortfolioRepositoryTrait>, CliError> {
    match config.store {
        StoreKind::Json => {
            let repository = JsonFileRepository::new(&config.data_dir)?;
            debug!("Using JSON store at {}", repository.file_path().display());
            Ok(Arc::new(repository))
        }
        StoreKind::Sqlite => {
            let db_path = config
                .db_path
                .clone()
                .unwrap_or_else(|| sqlite::get_db_path(&config.data_dir));
            debug!("Using SQLite store at {}", db_path.display());
            let (pool, writer) = sqlite::open(&db_path)?;
            Ok(Arc::new(SqlitePortfolioRepository::new(pool, writer)))
        }
    }
}
