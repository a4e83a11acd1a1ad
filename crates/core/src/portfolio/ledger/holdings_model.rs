use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::DISPLAY_DECIMAL_PRECISION;
use crate::utils::decimal_format;

/// Running per-ticker accumulator used during a replay.
///
/// `quantity` goes negative after a permissive over-sell.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OpenPosition {
    pub quantity: Decimal,
    pub cost_basis: Decimal,
}

impl OpenPosition {
    /// Cost per open share, or `None` when nothing is open.
    pub fn average_cost(&self) -> Option<Decimal> {
        if self.quantity > Decimal::ZERO {
            Some(
                self.cost_basis
                    .checked_div(self.quantity)
                    .unwrap_or(Decimal::MAX),
            )
        } else {
            None
        }
    }
}

/// Current position in one ticker, derived from the ledger and never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    pub ticker: String,
    #[serde(with = "decimal_format")]
    pub quantity: Decimal,
    #[serde(with = "decimal_format")]
    pub average_cost: Decimal,
    #[serde(with = "decimal_format")]
    pub total_cost: Decimal,
}

impl Holding {
    pub fn new(ticker: impl Into<String>, quantity: Decimal, average_cost: Decimal) -> Self {
        Self {
            ticker: ticker.into(),
            quantity,
            average_cost,
            total_cost: quantity.saturating_mul(average_cost),
        }
    }
}

impl fmt::Display for Holding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let precision = DISPLAY_DECIMAL_PRECISION as usize;
        write!(
            f,
            "{}: {} shares @ ${:.*} (Total Cost: ${:.*})",
            self.ticker,
            self.quantity.normalize(),
            precision,
            self.average_cost.round_dp(DISPLAY_DECIMAL_PRECISION),
            precision,
            self.total_cost.round_dp(DISPLAY_DECIMAL_PRECISION)
        )
    }
}
