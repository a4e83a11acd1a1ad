//! SQLite storage for Stockfolio.
//!
//! Implements `PortfolioRepositoryTrait` from `stockfolio-core` on top of
//! Diesel. This is the only crate that depends on Diesel; the core stays
//! storage-agnostic.
//!
//! ```text
//! core (ledger, service)
//!          │
//!          ▼
//!   storage-sqlite (this crate)
//!          │
//!          ▼
//!      SQLite DB
//! ```

pub mod db;
pub mod errors;
pub mod portfolio;
pub mod schema;

pub use db::{
    create_pool, get_connection, get_db_path, init, open, run_migrations, spawn_writer,
    DbConnection, DbPool, WriteHandle,
};

pub use errors::{IntoCore, StorageError};

pub use portfolio::{SqlitePortfolioRepository, DEFAULT_PORTFOLIO_ID};

pub use stockfolio_core::errors::{DatabaseError, Error, Result};
