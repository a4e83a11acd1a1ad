use stockfolio_core::transactions::normalize_ticker;
use stockfolio_core::PortfolioServiceTrait;

use super::CommandOutput;
use crate::cli::TransactionsArgs;

pub fn summary(service: &dyn PortfolioServiceTrait) -> CommandOutput {
    CommandOutput::Summary(service.get_summary())
}

pub fn holdings(service: &dyn PortfolioServiceTrait) -> CommandOutput {
    CommandOutput::Holdings(service.get_holdings())
}

pub fn transactions(service: &dyn PortfolioServiceTrait, args: &TransactionsArgs) -> CommandOutput {
    match &args.ticker {
        Some(ticker) => CommandOutput::Transactions {
            ticker: Some(normalize_ticker(ticker)),
            transactions: service.get_transactions_by_ticker(ticker),
        },
        None => CommandOutput::Transactions {
            ticker: None,
            transactions: service.get_transactions(),
        },
    }
}
