/// Transaction types
///
/// Purchase of shares. Increases quantity and cost basis.
pub const TRANSACTION_TYPE_BUY: &str = "BUY";

/// Disposal of shares. Decreases quantity and books a realized gain.
pub const TRANSACTION_TYPE_SELL: &str = "SELL";

/// Cash dividend received. Counts as income, never touches quantity or cost.
pub const TRANSACTION_TYPE_DIVIDEND: &str = "DIVIDEND";

/// Quantity recorded on every DIVIDEND; the amount is carried in the price.
pub const DIVIDEND_QUANTITY: i64 = 1;

/// Timestamp layout used in generated transaction ids (microsecond resolution).
pub const TRANSACTION_ID_TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S%6f";
