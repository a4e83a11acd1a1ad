/// Name given to a portfolio when none is configured or stored.
pub const DEFAULT_PORTFOLIO_NAME: &str = "My Portfolio";

/// Decimal precision for display
pub const DISPLAY_DECIMAL_PRECISION: u32 = 2;

/// Decimal places kept for percentages
pub const PERCENT_DECIMAL_PRECISION: u32 = 4;
