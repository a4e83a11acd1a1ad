//! Market valuation models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::utils::{decimal_format, timestamp_format};

/// One holding marked to market.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldingValuation {
    pub ticker: String,
    #[serde(with = "decimal_format")]
    pub quantity: Decimal,
    #[serde(with = "decimal_format")]
    pub average_cost: Decimal,
    #[serde(with = "decimal_format")]
    pub total_cost: Decimal,
    /// Zero when no price was available.
    #[serde(with = "decimal_format")]
    pub current_price: Decimal,
    #[serde(with = "decimal_format")]
    pub market_value: Decimal,
    #[serde(with = "decimal_format")]
    pub unrealized_gain: Decimal,
    /// `None` when total cost is not positive.
    #[serde(with = "decimal_format::option", default)]
    pub unrealized_gain_pct: Option<Decimal>,
    pub price_available: bool,
    /// Provider that supplied the price.
    #[serde(default)]
    pub source: Option<String>,
}

/// All holdings marked to market plus totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioValuation {
    pub name: String,
    pub holdings: Vec<HoldingValuation>,
    #[serde(with = "decimal_format")]
    pub total_market_value: Decimal,
    #[serde(with = "decimal_format")]
    pub total_cost_basis: Decimal,
    #[serde(with = "decimal_format")]
    pub total_unrealized_gain: Decimal,
    #[serde(with = "decimal_format::option", default)]
    pub total_unrealized_gain_pct: Option<Decimal>,
    pub unpriced_tickers: Vec<String>,
    #[serde(with = "timestamp_format")]
    pub valued_at: DateTime<Utc>,
}

/// Percentage of `amount` relative to `base`, absent for a non-positive base
/// or when the ratio is out of range.
pub(crate) fn percent_of(amount: Decimal, base: Decimal, dp: u32) -> Option<Decimal> {
    if base <= Decimal::ZERO {
        return None;
    }
    amount
        .checked_div(base)?
        .checked_mul(Decimal::ONE_HUNDRED)
        .map(|pct| pct.round_dp(dp))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_percent_of() {
        assert_eq!(percent_of(dec!(25), dec!(200), 2), Some(dec!(12.5)));
        assert_eq!(percent_of(dec!(25), Decimal::ZERO, 2), None);
        assert_eq!(percent_of(dec!(25), dec!(-10), 2), None);
        assert_eq!(percent_of(Decimal::MAX, dec!(0.5), 2), None);
    }
}
