pub mod valuation_model;
pub mod valuation_service;
mod valuation_traits;


pub use valuation_model::*;
pub use valuation_service::ValuationService;
pub use valuation_traits::ValuationServiceTrait;
