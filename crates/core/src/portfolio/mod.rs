//! Portfolio module - ledger replay, summaries, persistence contract and
//! valuation.

pub mod ledger;
pub mod snapshot;
pub mod valuation;

mod portfolio_model;
mod portfolio_service;
mod portfolio_traits;


#[cfg(test)]
mod portfolio_service_tests;

pub use ledger::{Holding, LedgerCalculator, LedgerState, LedgerWarning, LedgerWarningKind};
pub use portfolio_model::{Portfolio, PortfolioSummary};
pub use portfolio_service::{load_portfolio, PortfolioService};
pub use portfolio_traits::{PortfolioRepositoryTrait, PortfolioServiceTrait};
pub use snapshot::PortfolioSnapshot;
pub use valuation::{
    HoldingValuation, PortfolioValuation, ValuationService, ValuationServiceTrait,
};
