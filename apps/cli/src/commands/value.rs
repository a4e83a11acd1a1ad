use std::sync::Arc;

use stockfolio_core::{PortfolioServiceTrait, ValuationService, ValuationServiceTrait};
use stockfolio_market_data::{ManualProvider, MarketDataProvider, ProviderRegistry, YahooProvider};
use tracing::warn;

use super::CommandOutput;
use crate::cli::PriceSource;
use crate::config::Config;
use crate::error::CliError;

pub async fn run(
    service: &dyn PortfolioServiceTrait,
    config: &Config,
) -> Result<CommandOutput, CliError> {
    let provider = build_price_provider(config)?;
    let valuation = ValuationService::new(provider)
        .value_portfolio(&service.get_portfolio())
        .await;

    if !valuation.unpriced_tickers.is_empty() {
        warn!(
            "No price for {}; valued at 0",
            valuation.unpriced_tickers.join(", ")
        );
    }
    Ok(CommandOutput::Valuation(valuation))
}

/// Manual prices, when configured, take precedence over Yahoo.
fn build_price_provider(config: &Config) -> Result<Arc<dyn MarketDataProvider>, CliError> {
    let mut providers: Vec<Arc<dyn MarketDataProvider>> = Vec::new();

    let manual = match &config.manual_prices {
        Some(path) => {
            Some(ManualProvider::from_json_file(path).map_err(stockfolio_core::Error::from)?)
        }
        None => None,
    };

    match config.price_source {
        PriceSource::Manual => {
            let manual = manual.ok_or_else(|| {
                CliError::Config(
                    "manual prices need --price-file or STOCKFOLIO_MANUAL_PRICES".to_string(),
                )
            })?;
            providers.push(Arc::new(manual));
        }
        PriceSource::Yahoo => {
            if let Some(manual) = manual {
                providers.push(Arc::new(manual));
            }
            let yahoo = YahooProvider::new().map_err(stockfolio_core::Error::from)?;
            providers.push(Arc::new(yahoo));
        }
        PriceSource::None => {}
    }

    Ok(Arc::new(ProviderRegistry::new(providers)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::StoreKind;
    use rust_decimal_macros::dec;
    use std::path::Path;
    use stockfolio_core::{Portfolio, PortfolioService};
    use stockfolio_storage_json::JsonFileRepository;

    fn config(dir: &Path, price_source: PriceSource) -> Config {
        Config {
            data_dir: dir.to_path_buf(),
            store: StoreKind::Json,
            db_path: None,
            portfolio_name: "Valued".to_string(),
            price_source,
            manual_prices: None,
        }
    }

    async fn service_with_holdings(dir: &Path) -> PortfolioService {
        let repository = Arc::new(JsonFileRepository::new(dir).unwrap());
        let service = PortfolioService::load_or_create(repository, "Valued");
        service
            .record_buy("AAPL", dec!(10), dec!(150), None, None)
            .await
            .unwrap();
        service
            .record_buy("MSFT", dec!(2), dec!(400), None, None)
            .await
            .unwrap();
        service
    }

    #[tokio::test]
    async fn test_manual_prices_value_known_tickers() {
        let dir = tempfile::tempdir().unwrap();
        let service = service_with_holdings(dir.path()).await;
        let price_file = dir.path().join("prices.json");
        std::fs::write(&price_file, r#"{ "aapl": 175.5 }"#).unwrap();

        let mut config = config(dir.path(), PriceSource::Manual);
        config.manual_prices = Some(price_file);

        let CommandOutput::Valuation(valuation) = run(&service, &config).await.unwrap() else {
            panic!("expected valuation");
        };
        let aapl = &valuation.holdings[0];
        assert_eq!(aapl.ticker, "AAPL");
        assert!(aapl.price_available);
        assert_eq!(aapl.market_value, dec!(1755));
        assert_eq!(aapl.unrealized_gain, dec!(255));

        let msft = &valuation.holdings[1];
        assert!(!msft.price_available);
        assert_eq!(msft.market_value, dec!(0));
        assert_eq!(valuation.unpriced_tickers, vec!["MSFT".to_string()]);
        assert_eq!(valuation.total_cost_basis, dec!(2300));
    }

    #[tokio::test]
    async fn test_no_price_source_leaves_everything_unpriced() {
        let dir = tempfile::tempdir().unwrap();
        let service = service_with_holdings(dir.path()).await;

        let CommandOutput::Valuation(valuation) =
            run(&service, &config(dir.path(), PriceSource::None))
                .await
                .unwrap()
        else {
            panic!("expected valuation");
        };
        assert_eq!(valuation.unpriced_tickers.len(), 2);
        assert_eq!(valuation.total_market_value, dec!(0));
    }

    #[tokio::test]
    async fn test_manual_source_without_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let service = PortfolioService::new(
            Arc::new(JsonFileRepository::new(dir.path()).unwrap()),
            Portfolio::new("Empty"),
        );
        let err = run(&service, &config(dir.path(), PriceSource::Manual))
            .await
            .unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }

    #[tokio::test]
    async fn test_dividend_only_portfolio_has_nothing_to_value() {
        let dir = tempfile::tempdir().unwrap();
        let repository = Arc::new(JsonFileRepository::new(dir.path()).unwrap());
        let service = PortfolioService::load_or_create(repository, "Empty");
        service
            .record_dividend("KO", dec!(3), None)
            .await
            .unwrap();

        let CommandOutput::Valuation(valuation) =
            run(&service, &config(dir.path(), PriceSource::None))
                .await
                .unwrap()
        else {
            panic!("expected valuation");
        };
        assert!(valuation.holdings.is_empty());
        assert!(valuation.unpriced_tickers.is_empty());
    }
}
