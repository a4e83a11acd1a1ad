#[cfg(test)]
mod tests {
    use crate::errors::Error;
    use crate::portfolio::snapshot::PortfolioSnapshot;
    use crate::portfolio::Portfolio;
    use crate::stocks::Stock;
    use crate::transactions::{Transaction, TransactionType};
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    const NAIVE_TIMESTAMP_SNAPSHOT: &str = r#"{
  "name": "Retirement",
  "stocks": {
    "AAPL": { "ticker": "AAPL", "name": "Apple Inc." }
  },
  "transactions": [
    {
      "transaction_id": "AAPL_20240115103000123456",
      "ticker": "AAPL",
      "transaction_type": "BUY",
      "quantity": 10.0,
      "price": 150.0,
      "date": "2024-01-15T10:30:00.123456",
      "total_value": 1500.0
    },
    {
      "transaction_id": "AAPL_20240201090000000000",
      "ticker": "AAPL",
      "transaction_type": "DIVIDEND",
      "quantity": 1.0,
      "price": 2.4,
      "date": "2024-02-01T09:00:00",
      "total_value": 2.4
    }
  ]
}"#;

    #[test]
    fn test_loads_naive_timestamp_documents() {
        let snapshot = PortfolioSnapshot::from_json_str(NAIVE_TIMESTAMP_SNAPSHOT).unwrap();
        assert_eq!(snapshot.name, "Retirement");
        assert_eq!(snapshot.stocks["AAPL"].name(), "Apple Inc.");
        assert_eq!(snapshot.transactions.len(), 2);
        assert_eq!(
            snapshot.transactions[0].transaction_id(),
            "AAPL_20240115103000123456"
        );
        assert_eq!(snapshot.transactions[1].price(), dec!(2.4));
    }

    #[test]
    fn test_missing_sections_default() {
        let snapshot = PortfolioSnapshot::from_json_str("{}").unwrap();
        assert_eq!(snapshot, PortfolioSnapshot::default());
        assert_eq!(snapshot.name, "My Portfolio");
    }

    #[test]
    fn test_malformed_documents() {
        assert!(matches!(
            PortfolioSnapshot::from_json_str("{ \"name\": "),
            Err(Error::MalformedSnapshot(_))
        ));
        assert!(matches!(
            PortfolioSnapshot::from_json_str(r#"{"transactions": [{"ticker": "AAPL"}]}"#),
            Err(Error::MalformedSnapshot(_))
        ));
        assert!(matches!(
            PortfolioSnapshot::from_json_str(r#"{"transactions": {}}"#),
            Err(Error::MalformedSnapshot(_))
        ));
    }

    #[test]
    fn test_round_trip_through_json() {
        let mut portfolio = Portfolio::new("Growth");
        portfolio.add_stock(Stock::new("MSFT", "Microsoft").unwrap());
        portfolio.add_transaction(
            Transaction::with_details(
                "MSFT",
                TransactionType::Buy,
                dec!(3),
                dec!(150.5),
                Some(Utc.with_ymd_and_hms(2024, 3, 1, 14, 0, 0).unwrap()),
                None,
            )
            .unwrap(),
        );

        let json = portfolio.to_snapshot().to_json_pretty().unwrap();
        assert!(json.contains("\n  \"name\": \"Growth\""));

        let reloaded =
            Portfolio::from_snapshot(PortfolioSnapshot::from_json_str(&json).unwrap()).unwrap();
        assert_eq!(reloaded, portfolio);
        // Stock equality ignores the display name.
        assert_eq!(reloaded.stocks()["MSFT"].name(), "Microsoft");
    }

    #[test]
    fn test_overflowing_row_is_malformed() {
        let json = r#"{"transactions": [{
            "ticker": "AAPL",
            "transaction_type": "BUY",
            "quantity": "1000000000000000",
            "price": "1000000000000000",
            "date": "2024-01-15T10:30:00Z"
        }]}"#;
        assert!(matches!(
            PortfolioSnapshot::from_json_str(json),
            Err(Error::MalformedSnapshot(_))
        ));
    }
}
