//! Market data models
//!
//! - `quote` - Latest price quote returned by providers

mod quote;

pub use quote::Quote;
