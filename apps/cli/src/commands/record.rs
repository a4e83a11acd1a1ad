use stockfolio_core::{PortfolioServiceTrait, Stock};
use tracing::info;

use super::CommandOutput;
use crate::cli::{AddStockArgs, BuyArgs, DividendArgs, TradeArgs};
use crate::error::CliError;

pub async fn buy(
    service: &dyn PortfolioServiceTrait,
    args: &BuyArgs,
) -> Result<CommandOutput, CliError> {
    let trade = &args.trade;
    let transaction = service
        .record_buy(
            &trade.ticker,
            trade.quantity,
            trade.price,
            trade.date,
            args.name.clone(),
        )
        .await?;
    info!("Recorded {}", transaction.transaction_id());
    Ok(CommandOutput::Recorded(transaction))
}

pub async fn sell(
    service: &dyn PortfolioServiceTrait,
    args: &TradeArgs,
) -> Result<CommandOutput, CliError> {
    let transaction = service
        .record_sell(&args.ticker, args.quantity, args.price, args.date)
        .await?;
    info!("Recorded {}", transaction.transaction_id());
    Ok(CommandOutput::Recorded(transaction))
}

pub async fn dividend(
    service: &dyn PortfolioServiceTrait,
    args: &DividendArgs,
) -> Result<CommandOutput, CliError> {
    let transaction = service
        .record_dividend(&args.ticker, args.amount, args.date)
        .await?;
    info!("Recorded {}", transaction.transaction_id());
    Ok(CommandOutput::Recorded(transaction))
}

pub async fn add_stock(
    service: &dyn PortfolioServiceTrait,
    args: &AddStockArgs,
) -> Result<CommandOutput, CliError> {
    let stock = Stock::new(&args.ticker, &args.name)?;
    service.add_stock(stock.clone()).await?;
    Ok(CommandOutput::StockAdded(stock))
}
