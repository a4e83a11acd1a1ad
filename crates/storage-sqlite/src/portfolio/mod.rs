mod model;
mod repository;

pub use model::{NewPortfolioDB, PortfolioStockDB, PortfolioTransactionDB};
pub use repository::{SqlitePortfolioRepository, DEFAULT_PORTFOLIO_ID};
