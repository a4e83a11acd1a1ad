//! Portfolio snapshot module - the persisted form of a portfolio.

mod snapshot_model;

#[cfg(test)]
mod snapshot_model_tests;

pub use snapshot_model::*;
