use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::SqliteConnection;
use log::debug;
use std::sync::Arc;
use uuid::Uuid;

use stockfolio_core::errors::Result;
use stockfolio_core::{PortfolioRepositoryTrait, PortfolioSnapshot};

use super::model::{NewPortfolioDB, PortfolioStockDB, PortfolioTransactionDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::{portfolio_stocks, portfolio_transactions, portfolios};

/// Row id used when a database holds a single portfolio.
pub const DEFAULT_PORTFOLIO_ID: &str = "default";

/// Snapshot repository backed by SQLite.
///
/// Reads use the pool; writes go through the single writer actor. A save
/// replaces every row of the portfolio in one immediate transaction.
pub struct SqlitePortfolioRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
    portfolio_id: String,
}

impl SqlitePortfolioRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self::with_portfolio_id(pool, writer, DEFAULT_PORTFOLIO_ID)
    }

    pub fn with_portfolio_id(
        pool: Arc<DbPool>,
        writer: WriteHandle,
        portfolio_id: impl Into<String>,
    ) -> Self {
        SqlitePortfolioRepository {
            pool,
            writer,
            portfolio_id: portfolio_id.into(),
        }
    }

    fn load_snapshot_impl(&self) -> Result<Option<PortfolioSnapshot>> {
        let mut conn = get_connection(&self.pool)?;

        let name = portfolios::table
            .filter(portfolios::id.eq(&self.portfolio_id))
            .select(portfolios::name)
            .first::<String>(&mut conn)
            .optional()
            .into_core()?;

        let Some(name) = name else {
            return Ok(None);
        };

        let stock_rows = portfolio_stocks::table
            .filter(portfolio_stocks::portfolio_id.eq(&self.portfolio_id))
            .order(portfolio_stocks::ticker.asc())
            .select(PortfolioStockDB::as_select())
            .load::<PortfolioStockDB>(&mut conn)
            .into_core()?;

        let transaction_rows = portfolio_transactions::table
            .filter(portfolio_transactions::portfolio_id.eq(&self.portfolio_id))
            .order(portfolio_transactions::position.asc())
            .select(PortfolioTransactionDB::as_select())
            .load::<PortfolioTransactionDB>(&mut conn)
            .into_core()?;

        let mut snapshot = PortfolioSnapshot {
            name,
            ..Default::default()
        };
        for row in stock_rows {
            let stock = row.into_domain()?;
            snapshot.stocks.insert(stock.ticker().to_string(), stock);
        }
        snapshot.transactions = transaction_rows
            .into_iter()
            .map(PortfolioTransactionDB::into_domain)
            .collect::<Result<Vec<_>>>()?;

        debug!(
            "Loaded portfolio '{}' with {} transactions",
            snapshot.name,
            snapshot.transactions.len()
        );
        Ok(Some(snapshot))
    }
}

fn delete_portfolio_rows(conn: &mut SqliteConnection, portfolio_id: &str) -> Result<()> {
    diesel::delete(
        portfolio_transactions::table.filter(portfolio_transactions::portfolio_id.eq(portfolio_id)),
    )
    .execute(conn)
    .into_core()?;
    diesel::delete(portfolio_stocks::table.filter(portfolio_stocks::portfolio_id.eq(portfolio_id)))
        .execute(conn)
        .into_core()?;
    diesel::delete(portfolios::table.filter(portfolios::id.eq(portfolio_id)))
        .execute(conn)
        .into_core()?;
    Ok(())
}

#[async_trait]
impl PortfolioRepositoryTrait for SqlitePortfolioRepository {
    fn load_snapshot(&self) -> Result<Option<PortfolioSnapshot>> {
        self.load_snapshot_impl()
    }

    fn snapshot_exists(&self) -> Result<bool> {
        let mut conn = get_connection(&self.pool)?;
        let count = portfolios::table
            .filter(portfolios::id.eq(&self.portfolio_id))
            .count()
            .get_result::<i64>(&mut conn)
            .into_core()?;
        Ok(count > 0)
    }

    async fn save_snapshot(&self, snapshot: PortfolioSnapshot) -> Result<()> {
        let portfolio_id = self.portfolio_id.clone();

        let portfolio_row = NewPortfolioDB {
            id: portfolio_id.clone(),
            name: snapshot.name,
            updated_at: Utc::now().naive_utc(),
        };
        let stock_rows: Vec<PortfolioStockDB> = snapshot
            .stocks
            .values()
            .map(|stock| PortfolioStockDB::from_domain(&portfolio_id, stock))
            .collect();
        let transaction_rows: Vec<PortfolioTransactionDB> = snapshot
            .transactions
            .iter()
            .enumerate()
            .map(|(position, transaction)| {
                PortfolioTransactionDB::from_domain(
                    Uuid::new_v4().to_string(),
                    &portfolio_id,
                    position as i32,
                    transaction,
                )
            })
            .collect();

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                delete_portfolio_rows(conn, &portfolio_id)?;

                diesel::insert_into(portfolios::table)
                    .values(&portfolio_row)
                    .execute(conn)
                    .into_core()?;
                for row in &stock_rows {
                    diesel::insert_into(portfolio_stocks::table)
                        .values(row)
                        .execute(conn)
                        .into_core()?;
                }
                for row in &transaction_rows {
                    diesel::insert_into(portfolio_transactions::table)
                        .values(row)
                        .execute(conn)
                        .into_core()?;
                }

                debug!(
                    "Saved portfolio {} ({} stocks, {} transactions)",
                    portfolio_id,
                    stock_rows.len(),
                    transaction_rows.len()
                );
                Ok(())
            })
            .await
    }

    async fn clear_snapshot(&self) -> Result<()> {
        let portfolio_id = self.portfolio_id.clone();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                delete_portfolio_rows(conn, &portfolio_id)
            })
            .await
    }
}
