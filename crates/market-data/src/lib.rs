//! Stockfolio Market Data Crate
//!
//! This crate provides the live price source used to value a portfolio.
//! Lookups are keyed by ticker and fallible; callers decide how to degrade
//! when a price is unavailable.
//!
//! # Architecture
//!
//! ```text
//! +------------------+
//! | ValuationService |  (stockfolio-core)
//! +------------------+
//!          |
//!          v
//! +------------------+
//! | ProviderRegistry |  (priority order, failover)
//! +------------------+
//!          |
//!          v
//! +------------------+
//! |    Provider      |  (Yahoo, Manual)
//! +------------------+
//!          |
//!          v
//! +------------------+
//! |     Quote        |
//! +------------------+
//! ```

pub mod errors;
pub mod models;
pub mod provider;
pub mod registry;

pub use errors::{MarketDataError, RetryClass};
pub use models::Quote;
pub use provider::manual::ManualProvider;
pub use provider::yahoo::YahooProvider;
pub use provider::MarketDataProvider;
pub use registry::ProviderRegistry;
