#[cfg(test)]
mod tests {
    use crate::errors::{Error, Result};
    use crate::portfolio::{
        load_portfolio, Portfolio, PortfolioRepositoryTrait, PortfolioService,
        PortfolioServiceTrait, PortfolioSnapshot,
    };
    use crate::stocks::Stock;
    use crate::transactions::{Transaction, TransactionType};
    use async_trait::async_trait;
    use rust_decimal_macros::dec;
    use std::sync::{Arc, Mutex};

    // --- Mock PortfolioRepository ---
    #[derive(Default)]
    struct MockPortfolioRepository {
        stored: Mutex<Option<PortfolioSnapshot>>,
        load_error: Option<String>,
        fail_saves: bool,
        save_count: Mutex<usize>,
    }

    impl MockPortfolioRepository {
        fn with_snapshot(snapshot: PortfolioSnapshot) -> Self {
            Self {
                stored: Mutex::new(Some(snapshot)),
                ..Default::default()
            }
        }

        fn stored(&self) -> Option<PortfolioSnapshot> {
            self.stored.lock().unwrap().clone()
        }

        fn saves(&self) -> usize {
            *self.save_count.lock().unwrap()
        }
    }

    #[async_trait]
    impl PortfolioRepositoryTrait for MockPortfolioRepository {
        fn load_snapshot(&self) -> Result<Option<PortfolioSnapshot>> {
            if let Some(message) = &self.load_error {
                return Err(Error::MalformedSnapshot(message.clone()));
            }
            Ok(self.stored())
        }

        fn snapshot_exists(&self) -> Result<bool> {
            Ok(self.stored.lock().unwrap().is_some())
        }

        async fn save_snapshot(&self, snapshot: PortfolioSnapshot) -> Result<()> {
            if self.fail_saves {
                return Err(Error::Io("disk full".to_string()));
            }
            *self.save_count.lock().unwrap() += 1;
            *self.stored.lock().unwrap() = Some(snapshot);
            Ok(())
        }

        async fn clear_snapshot(&self) -> Result<()> {
            *self.stored.lock().unwrap() = None;
            Ok(())
        }
    }

    fn stored_portfolio() -> PortfolioSnapshot {
        let mut portfolio = Portfolio::new("Stored");
        portfolio.add_transaction(
            Transaction::new("AAPL", TransactionType::Buy, dec!(10), dec!(150)).unwrap(),
        );
        portfolio.to_snapshot()
    }

    #[test]
    fn test_load_or_create_uses_stored_snapshot() {
        let repo = Arc::new(MockPortfolioRepository::with_snapshot(stored_portfolio()));
        let service = PortfolioService::load_or_create(repo, "Fresh");
        assert_eq!(service.get_portfolio().name(), "Stored");
        assert_eq!(service.get_holdings()["AAPL"].quantity, dec!(10));
    }

    #[test]
    fn test_load_or_create_starts_fresh_when_nothing_stored() {
        let repo = Arc::new(MockPortfolioRepository::default());
        let service = PortfolioService::load_or_create(repo, "Fresh");
        assert_eq!(service.get_portfolio().name(), "Fresh");
        assert!(service.get_transactions().is_empty());
    }

    #[test]
    fn test_load_or_create_falls_back_on_malformed_data() {
        let repo = MockPortfolioRepository {
            load_error: Some("missing field `ticker`".to_string()),
            ..Default::default()
        };
        assert!(load_portfolio(&repo).is_none());

        let service = PortfolioService::load_or_create(Arc::new(repo), "Fresh");
        assert_eq!(service.get_portfolio().name(), "Fresh");
    }

    #[tokio::test]
    async fn test_record_buy_persists_and_registers_name() {
        let repo = Arc::new(MockPortfolioRepository::default());
        let service = PortfolioService::load_or_create(repo.clone(), "Mine");

        let transaction = service
            .record_buy("aapl", dec!(10), dec!(150), None, Some("Apple Inc.".to_string()))
            .await
            .unwrap();
        assert_eq!(transaction.ticker(), "AAPL");

        let stored = repo.stored().unwrap();
        assert_eq!(stored.name, "Mine");
        assert_eq!(stored.transactions.len(), 1);
        assert_eq!(stored.stocks["AAPL"].name(), "Apple Inc.");
        assert_eq!(repo.saves(), 1);
    }

    #[tokio::test]
    async fn test_record_sell_rejects_oversell_without_saving() {
        let repo = Arc::new(MockPortfolioRepository::with_snapshot(stored_portfolio()));
        let service = PortfolioService::load_or_create(repo.clone(), "Fresh");

        let err = service
            .record_sell("AAPL", dec!(11), dec!(160), None)
            .await
            .unwrap_err();
        assert!(err.is_state_conflict());
        assert_eq!(repo.saves(), 0);
        assert_eq!(service.get_transactions().len(), 1);

        service
            .record_sell("AAPL", dec!(4), dec!(160), None)
            .await
            .unwrap();
        assert_eq!(service.get_realized_gains(), dec!(40));
        assert_eq!(repo.saves(), 1);
    }

    #[tokio::test]
    async fn test_invalid_input_is_rejected_before_saving() {
        let repo = Arc::new(MockPortfolioRepository::default());
        let service = PortfolioService::load_or_create(repo.clone(), "Mine");

        let err = service
            .record_buy("AAPL", dec!(-1), dec!(150), None, None)
            .await
            .unwrap_err();
        assert!(err.is_validation());
        assert!(service
            .record_dividend("AAPL", dec!(0), None)
            .await
            .is_err());
        assert_eq!(repo.saves(), 0);
    }

    #[tokio::test]
    async fn test_failed_save_leaves_state_unchanged() {
        let repo = Arc::new(MockPortfolioRepository {
            fail_saves: true,
            ..Default::default()
        });
        let service = PortfolioService::load_or_create(repo, "Mine");

        let result = service
            .record_buy("AAPL", dec!(1), dec!(150), None, None)
            .await;
        assert!(matches!(result, Err(Error::Io(_))));
        assert!(service.get_transactions().is_empty());
    }

    #[tokio::test]
    async fn test_dividend_and_queries() {
        let repo = Arc::new(MockPortfolioRepository::with_snapshot(stored_portfolio()));
        let service = PortfolioService::load_or_create(repo, "Fresh");

        service
            .record_dividend("aapl", dec!(8.5), None)
            .await
            .unwrap();
        assert_eq!(service.get_dividend_income(), dec!(8.5));
        assert_eq!(service.get_transactions_by_ticker("AAPL").len(), 2);
        assert_eq!(service.get_summary().total_return, dec!(8.5));
        assert!(service.get_oversold_tickers().is_empty());
    }

    #[tokio::test]
    async fn test_add_stock_persists() {
        let repo = Arc::new(MockPortfolioRepository::default());
        let service = PortfolioService::load_or_create(repo.clone(), "Mine");
        service
            .add_stock(Stock::new("GOOGL", "Alphabet").unwrap())
            .await
            .unwrap();
        assert_eq!(repo.stored().unwrap().stocks["GOOGL"].name(), "Alphabet");
    }

    #[tokio::test]
    async fn test_clear_removes_snapshot_and_resets() {
        let repo = Arc::new(MockPortfolioRepository::with_snapshot(stored_portfolio()));
        let service = PortfolioService::load_or_create(repo.clone(), "Fresh");

        service.clear().await.unwrap();
        assert!(!repo.snapshot_exists().unwrap());
        assert!(service.get_transactions().is_empty());
        assert_eq!(service.get_portfolio().name(), "Stored");
    }
}
