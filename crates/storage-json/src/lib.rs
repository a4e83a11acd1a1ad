//! JSON file storage for Stockfolio.
//!
//! Keeps the whole portfolio in a single pretty-printed snapshot file,
//! `<data_dir>/portfolio.json`. Each save rewrites the file through a
//! temporary sibling and an atomic rename. A file that fails to load is
//! moved to `portfolio.json.corrupt` before the next save replaces it.

mod repository;

pub use repository::{JsonFileRepository, PORTFOLIO_FILE_NAME, UNREADABLE_FILE_NAME};

pub use stockfolio_core::errors::{Error, Result};
