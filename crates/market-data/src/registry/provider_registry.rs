use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::errors::{MarketDataError, RetryClass};
use crate::models::Quote;
use crate::provider::MarketDataProvider;

/// Queries providers in priority order (lower first) until one returns a
/// usable quote.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    providers: Vec<Arc<dyn MarketDataProvider>>,
}

impl ProviderRegistry {
    pub fn new(mut providers: Vec<Arc<dyn MarketDataProvider>>) -> Self {
        providers.sort_by_key(|p| p.priority());
        Self { providers }
    }

    pub fn provider_ids(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.id()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    fn validate(quote: &Quote) -> Result<(), MarketDataError> {
        if quote.close <= Decimal::ZERO {
            return Err(MarketDataError::ValidationFailed {
                message: format!(
                    "{} returned non-positive close {} for {}",
                    quote.source, quote.close, quote.symbol
                ),
            });
        }
        Ok(())
    }

    pub async fn fetch_latest_quote(&self, symbol: &str) -> Result<Quote, MarketDataError> {
        if self.providers.is_empty() {
            return Err(MarketDataError::NoProvidersAvailable);
        }

        let mut last_error: Option<MarketDataError> = None;

        for provider in &self.providers {
            match provider.get_latest_quote(symbol).await {
                Ok(quote) => {
                    if let Err(e) = Self::validate(&quote) {
                        warn!("Latest quote validation failed: {}", e);
                        last_error = Some(e);
                        continue;
                    }
                    debug!("{} priced {} at {}", provider.id(), symbol, quote.close);
                    return Ok(quote);
                }
                Err(e) => {
                    if e.retry_class() == RetryClass::Never {
                        return Err(e);
                    }
                    debug!("{} could not price {}: {}", provider.id(), symbol, e);
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or(MarketDataError::AllProvidersFailed))
    }
}

#[async_trait]
impl MarketDataProvider for ProviderRegistry {
    fn id(&self) -> &'static str {
        "REGISTRY"
    }

    async fn get_latest_quote(&self, symbol: &str) -> Result<Quote, MarketDataError> {
        self.fetch_latest_quote(symbol).await
    }
}
