use async_trait::async_trait;
use chrono::Utc;
use log::{debug, warn};
use rust_decimal::Decimal;
use std::sync::Arc;
use stockfolio_market_data::MarketDataProvider;

use super::valuation_model::{percent_of, HoldingValuation, PortfolioValuation};
use super::valuation_traits::ValuationServiceTrait;
use crate::constants::PERCENT_DECIMAL_PRECISION;
use crate::portfolio::ledger::Holding;
use crate::portfolio::Portfolio;

#[derive(Clone)]
pub struct ValuationService {
    price_provider: Arc<dyn MarketDataProvider>,
}

impl ValuationService {
    pub fn new(price_provider: Arc<dyn MarketDataProvider>) -> Self {
        Self { price_provider }
    }

    async fn value_holding(&self, holding: &Holding) -> HoldingValuation {
        let (current_price, source) =
            match self.price_provider.get_latest_quote(&holding.ticker).await {
                Ok(quote) => (Some(quote.close), Some(quote.source)),
                Err(e) => {
                    warn!(
                        "Price lookup for {} failed: {}. Valuing at 0.",
                        holding.ticker, e
                    );
                    (None, None)
                }
            };

        let price = current_price.unwrap_or(Decimal::ZERO);
        let market_value = holding.quantity.saturating_mul(price);
        let unrealized_gain = market_value.saturating_sub(holding.total_cost);

        HoldingValuation {
            ticker: holding.ticker.clone(),
            quantity: holding.quantity,
            average_cost: holding.average_cost,
            total_cost: holding.total_cost,
            current_price: price,
            market_value,
            unrealized_gain,
            unrealized_gain_pct: percent_of(
                unrealized_gain,
                holding.total_cost,
                PERCENT_DECIMAL_PRECISION,
            ),
            price_available: current_price.is_some(),
            source,
        }
    }
}

#[async_trait]
impl ValuationServiceTrait for ValuationService {
    async fn value_portfolio(&self, portfolio: &Portfolio) -> PortfolioValuation {
        let holdings = portfolio.get_holdings();
        debug!(
            "Valuing {} holdings of '{}' via {}",
            holdings.len(),
            portfolio.name(),
            self.price_provider.id()
        );

        let mut valued = Vec::with_capacity(holdings.len());
        for holding in holdings.values() {
            valued.push(self.value_holding(holding).await);
        }

        let total_market_value = valued
            .iter()
            .fold(Decimal::ZERO, |acc, h| acc.saturating_add(h.market_value));
        let total_cost_basis = valued
            .iter()
            .fold(Decimal::ZERO, |acc, h| acc.saturating_add(h.total_cost));
        let total_unrealized_gain = total_market_value.saturating_sub(total_cost_basis);
        let unpriced_tickers: Vec<String> = valued
            .iter()
            .filter(|h| !h.price_available)
            .map(|h| h.ticker.clone())
            .collect();

        PortfolioValuation {
            name: portfolio.name().to_string(),
            holdings: valued,
            total_market_value,
            total_cost_basis,
            total_unrealized_gain,
            total_unrealized_gain_pct: percent_of(
                total_unrealized_gain,
                total_cost_basis,
                PERCENT_DECIMAL_PRECISION,
            ),
            unpriced_tickers,
            valued_at: Utc::now(),
        }
    }
}
