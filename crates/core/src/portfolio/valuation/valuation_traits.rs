use async_trait::async_trait;

use super::PortfolioValuation;
use crate::portfolio::Portfolio;

/// Values a portfolio's open holdings at current market prices.
#[async_trait]
pub trait ValuationServiceTrait: Send + Sync {
    /// Looks up each held ticker once. A failed lookup never fails the call;
    /// the ticker is reported in `unpriced_tickers` instead.
    async fn value_portfolio(&self, portfolio: &Portfolio) -> PortfolioValuation;
}
