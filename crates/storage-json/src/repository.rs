use async_trait::async_trait;
use log::{debug, info, warn};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use tempfile::NamedTempFile;

use stockfolio_core::errors::{Error, Result};
use stockfolio_core::{PortfolioRepositoryTrait, PortfolioSnapshot};

pub const PORTFOLIO_FILE_NAME: &str = "portfolio.json";

/// Name an unreadable snapshot is moved to before it would be overwritten.
pub const UNREADABLE_FILE_NAME: &str = "portfolio.json.corrupt";

/// Snapshot repository backed by one JSON file.
pub struct JsonFileRepository {
    data_dir: PathBuf,
    file_path: PathBuf,
    /// Set when the last load found a malformed file.
    unreadable: AtomicBool,
}

impl JsonFileRepository {
    /// Uses `<data_dir>/portfolio.json`, creating `data_dir` if needed.
    pub fn new(data_dir: impl Into<PathBuf>) -> Result<Self> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir).map_err(|e| {
            Error::Io(format!(
                "Failed to create data directory {}: {}",
                data_dir.display(),
                e
            ))
        })?;
        let file_path = data_dir.join(PORTFOLIO_FILE_NAME);
        Ok(Self {
            data_dir,
            file_path,
            unreadable: AtomicBool::new(false),
        })
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    pub fn unreadable_file_path(&self) -> PathBuf {
        self.data_dir.join(UNREADABLE_FILE_NAME)
    }

    /// Keeps a copy of a file that failed to load, replacing any older copy.
    fn set_aside_unreadable(&self) -> Result<()> {
        let target = self.unreadable_file_path();
        match fs::rename(&self.file_path, &target) {
            Ok(()) => {
                warn!(
                    "Moved unreadable snapshot {} to {}",
                    self.file_path.display(),
                    target.display()
                );
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::Io(format!(
                "Failed to move unreadable {} aside: {}",
                self.file_path.display(),
                e
            ))),
        }
    }

    fn write_atomically(&self, contents: &str) -> Result<()> {
        let mut temp = NamedTempFile::new_in(&self.data_dir)?;
        temp.write_all(contents.as_bytes())?;
        temp.write_all(b"\n")?;
        temp.as_file().sync_all()?;
        temp.persist(&self.file_path)
            .map_err(|e| Error::Io(format!("Failed to replace {}: {}", self.file_path.display(), e)))?;
        Ok(())
    }
}

#[async_trait]
impl PortfolioRepositoryTrait for JsonFileRepository {
    fn load_snapshot(&self) -> Result<Option<PortfolioSnapshot>> {
        let contents = match fs::read_to_string(&self.file_path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        debug!("Loaded snapshot from {}", self.file_path.display());
        match PortfolioSnapshot::from_json_str(&contents) {
            Ok(snapshot) => {
                self.unreadable.store(false, Ordering::SeqCst);
                Ok(Some(snapshot))
            }
            Err(e) => {
                self.unreadable.store(true, Ordering::SeqCst);
                Err(e)
            }
        }
    }

    fn snapshot_exists(&self) -> Result<bool> {
        Ok(self.file_path.is_file())
    }

    async fn save_snapshot(&self, snapshot: PortfolioSnapshot) -> Result<()> {
        let json = snapshot.to_json_pretty()?;
        if self.unreadable.swap(false, Ordering::SeqCst) {
            if let Err(e) = self.set_aside_unreadable() {
                self.unreadable.store(true, Ordering::SeqCst);
                return Err(e);
            }
        }
        self.write_atomically(&json)?;
        debug!(
            "Saved {} transactions to {}",
            snapshot.transactions.len(),
            self.file_path.display()
        );
        Ok(())
    }

    async fn clear_snapshot(&self) -> Result<()> {
        self.unreadable.store(false, Ordering::SeqCst);
        match fs::remove_file(&self.file_path) {
            Ok(()) => {
                info!("Removed {}", self.file_path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;
    use stockfolio_core::{
        Portfolio, PortfolioService, PortfolioServiceTrait, Stock, Transaction, TransactionType,
    };
    use std::sync::Arc;

    fn sample_portfolio() -> Portfolio {
        let mut portfolio = Portfolio::new("Json");
        portfolio.add_stock(Stock::new("AAPL", "Apple Inc.").unwrap());
        portfolio.add_transaction(
            Transaction::with_details(
                "AAPL",
                TransactionType::Buy,
                dec!(10),
                dec!(150),
                Some(Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap()),
                None,
            )
            .unwrap(),
        );
        portfolio.add_transaction(
            Transaction::with_details(
                "AAPL",
                TransactionType::Sell,
                dec!(4),
                dec!(155.25),
                Some(Utc.with_ymd_and_hms(2024, 2, 1, 9, 0, 0).unwrap()),
                None,
            )
            .unwrap(),
        );
        portfolio
    }

    #[test]
    fn test_creates_data_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let repo = JsonFileRepository::new(&nested).unwrap();
        assert!(nested.is_dir());
        assert_eq!(repo.file_path(), nested.join("portfolio.json"));
        assert!(!repo.snapshot_exists().unwrap());
        assert!(repo.load_snapshot().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileRepository::new(dir.path()).unwrap();
        let portfolio = sample_portfolio();

        repo.save_snapshot(portfolio.to_snapshot()).await.unwrap();
        assert!(repo.snapshot_exists().unwrap());

        let loaded = repo.load_snapshot().unwrap().unwrap();
        let restored = Portfolio::from_snapshot(loaded).unwrap();
        assert_eq!(restored, portfolio);
        assert_eq!(restored.stocks()["AAPL"].name(), "Apple Inc.");
        assert_eq!(restored.get_realized_gains(), dec!(21));
    }

    #[tokio::test]
    async fn test_file_is_pretty_printed() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileRepository::new(dir.path()).unwrap();
        repo.save_snapshot(sample_portfolio().to_snapshot())
            .await
            .unwrap();

        let contents = fs::read_to_string(repo.file_path()).unwrap();
        assert!(contents.starts_with("{\n  \"name\": \"Json\""));
        assert!(contents.contains("\"transaction_type\": \"SELL\""));
        assert!(contents.contains("\"price\": 155.25"));
    }

    #[test]
    fn test_malformed_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileRepository::new(dir.path()).unwrap();
        fs::write(repo.file_path(), "{ \"transactions\": [ {\"ticker\": ").unwrap();

        assert!(matches!(
            repo.load_snapshot(),
            Err(Error::MalformedSnapshot(_))
        ));
    }

    #[test]
    fn test_service_falls_back_on_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileRepository::new(dir.path()).unwrap();
        fs::write(repo.file_path(), "not json at all").unwrap();

        let service = PortfolioService::load_or_create(Arc::new(repo), "Fallback");
        assert_eq!(service.get_portfolio().name(), "Fallback");
        assert!(service.get_transactions().is_empty());
    }

    #[tokio::test]
    async fn test_first_save_after_malformed_load_keeps_old_file() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Arc::new(JsonFileRepository::new(dir.path()).unwrap());
        fs::write(repo.file_path(), "not json at all").unwrap();

        let service = PortfolioService::load_or_create(repo.clone(), "Fallback");
        service
            .record_buy("AAPL", dec!(1), dec!(100), None, None)
            .await
            .unwrap();

        let kept = repo.unreadable_file_path();
        assert_eq!(fs::read_to_string(&kept).unwrap(), "not json at all");
        assert_eq!(repo.load_snapshot().unwrap().unwrap().transactions.len(), 1);

        // Later saves leave the set-aside copy alone.
        service
            .record_buy("AAPL", dec!(1), dec!(110), None, None)
            .await
            .unwrap();
        assert_eq!(fs::read_to_string(&kept).unwrap(), "not json at all");
    }

    #[tokio::test]
    async fn test_save_after_clean_load_does_not_set_aside() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileRepository::new(dir.path()).unwrap();
        repo.save_snapshot(sample_portfolio().to_snapshot())
            .await
            .unwrap();
        assert!(repo.load_snapshot().unwrap().is_some());

        repo.save_snapshot(sample_portfolio().to_snapshot())
            .await
            .unwrap();
        assert!(!repo.unreadable_file_path().exists());
    }

    #[tokio::test]
    async fn test_service_persists_each_mutation() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Arc::new(JsonFileRepository::new(dir.path()).unwrap());
        let service = PortfolioService::load_or_create(repo.clone(), "Mine");

        service
            .record_buy("msft", dec!(3), dec!(300), None, Some("Microsoft".into()))
            .await
            .unwrap();
        service
            .record_dividend("MSFT", dec!(2.25), None)
            .await
            .unwrap();

        let reloaded = PortfolioService::load_or_create(repo, "Other");
        assert_eq!(reloaded.get_portfolio().name(), "Mine");
        assert_eq!(reloaded.get_transactions().len(), 2);
        assert_eq!(reloaded.get_dividend_income(), dec!(2.25));
        assert_eq!(reloaded.get_portfolio().stocks()["MSFT"].name(), "Microsoft");
    }

    #[tokio::test]
    async fn test_clear_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileRepository::new(dir.path()).unwrap();
        repo.save_snapshot(sample_portfolio().to_snapshot())
            .await
            .unwrap();

        repo.clear_snapshot().await.unwrap();
        assert!(!repo.snapshot_exists().unwrap());
        // Clearing twice is fine.
        repo.clear_snapshot().await.unwrap();
    }
}
