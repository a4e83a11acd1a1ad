//! Ledger replay: the single pass that turns transactions into positions,
//! realized gains and dividend income.

mod holdings_model;
mod ledger_calculator;


pub use holdings_model::{Holding, OpenPosition};
pub use ledger_calculator::{LedgerCalculator, LedgerState, LedgerWarning, LedgerWarningKind};
