use log::{debug, warn};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::fmt;

use super::holdings_model::{Holding, OpenPosition};
use crate::transactions::{Transaction, TransactionType};

/// What a [`LedgerWarning`] is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerWarningKind {
    /// A SELL took the open quantity below zero.
    Oversell,
    /// The transaction's amounts do not fit in a `Decimal` alongside the
    /// running totals; it was left out of them.
    Overflow,
}

/// Non-fatal issue found while replaying. The replay continues past it.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerWarning {
    pub kind: LedgerWarningKind,
    pub transaction_id: String,
    pub ticker: String,
    pub message: String,
}

impl LedgerWarning {
    fn new(kind: LedgerWarningKind, transaction: &Transaction, message: String) -> Self {
        warn!("{} ({})", message, transaction.transaction_id());
        Self {
            kind,
            transaction_id: transaction.transaction_id().to_string(),
            ticker: transaction.ticker().to_string(),
            message,
        }
    }
}

impl fmt::Display for LedgerWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Transaction {} ({}): {}",
            self.transaction_id, self.ticker, self.message
        )
    }
}

/// Result of one forward pass over a transaction list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LedgerState {
    pub positions: BTreeMap<String, OpenPosition>,
    pub realized_gains: Decimal,
    pub dividend_income: Decimal,
    pub warnings: Vec<LedgerWarning>,
}

impl LedgerState {
    fn open_position(&self, ticker: &str) -> OpenPosition {
        self.positions.get(ticker).copied().unwrap_or_default()
    }

    /// Open quantity for a ticker; zero if it was never traded.
    pub fn open_quantity(&self, ticker: &str) -> Decimal {
        self.positions
            .get(ticker)
            .map(|p| p.quantity)
            .unwrap_or(Decimal::ZERO)
    }

    /// Tickers with a strictly positive open quantity, keyed and ordered by ticker.
    pub fn holdings(&self) -> BTreeMap<String, Holding> {
        self.positions
            .iter()
            .filter_map(|(ticker, position)| {
                position
                    .average_cost()
                    .map(|avg| (ticker.clone(), Holding::new(ticker, position.quantity, avg)))
            })
            .collect()
    }

    /// Tickers whose open quantity went below zero.
    pub fn oversold_tickers(&self) -> Vec<String> {
        self.positions
            .iter()
            .filter(|(_, p)| p.quantity < Decimal::ZERO)
            .map(|(ticker, _)| ticker.clone())
            .collect()
    }

    /// True if the transaction with this id was left out of the totals.
    pub fn overflowed(&self, transaction_id: &str) -> bool {
        self.warnings
            .iter()
            .any(|w| w.kind == LedgerWarningKind::Overflow && w.transaction_id == transaction_id)
    }
}

/// Weighted-average cost replay.
///
/// Every derived view of a portfolio (holdings, realized gains, dividend
/// income) is produced by [`LedgerCalculator::replay`], so the views always
/// agree with each other and with the ledger.
pub struct LedgerCalculator;

impl LedgerCalculator {
    /// Replays `transactions` in list order.
    ///
    /// * BUY adds quantity and `total_value` to the open cost basis.
    /// * SELL removes `avg_cost * quantity` from the cost basis and books
    ///   `sell_value - cost_removed` as realized gain. With nothing open the
    ///   whole sell value is booked as gain and the quantity goes negative.
    /// * DIVIDEND adds `total_value` to dividend income only.
    ///
    /// A transaction whose arithmetic would overflow is skipped with a
    /// [`LedgerWarningKind::Overflow`] warning, leaving the state untouched.
    pub fn replay(transactions: &[Transaction]) -> LedgerState {
        let mut state = LedgerState::default();

        for transaction in transactions {
            let applied = match transaction.transaction_type() {
                TransactionType::Buy => Self::handle_buy(transaction, &mut state),
                TransactionType::Sell => Self::handle_sell(transaction, &mut state),
                TransactionType::Dividend => Self::handle_dividend(transaction, &mut state),
            };
            if applied.is_none() {
                let message = format!(
                    "{} {} @ {} overflows the running totals; skipped",
                    transaction.transaction_type(),
                    transaction.quantity(),
                    transaction.price()
                );
                state.warnings.push(LedgerWarning::new(
                    LedgerWarningKind::Overflow,
                    transaction,
                    message,
                ));
            }
        }

        debug!(
            "Replayed {} transactions: {} tickers, realized {}, dividends {}",
            transactions.len(),
            state.positions.len(),
            state.realized_gains,
            state.dividend_income
        );

        state
    }

    fn handle_dividend(transaction: &Transaction, state: &mut LedgerState) -> Option<()> {
        state.dividend_income = state
            .dividend_income
            .checked_add(transaction.total_value())?;
        Some(())
    }

    fn handle_buy(transaction: &Transaction, state: &mut LedgerState) -> Option<()> {
        let current = state.open_position(transaction.ticker());
        let next = OpenPosition {
            quantity: current.quantity.checked_add(transaction.quantity())?,
            cost_basis: current.cost_basis.checked_add(transaction.total_value())?,
        };
        state.positions.insert(transaction.ticker().to_string(), next);
        Some(())
    }

    fn handle_sell(transaction: &Transaction, state: &mut LedgerState) -> Option<()> {
        let current = state.open_position(transaction.ticker());
        let sell_quantity = transaction.quantity();
        let sell_value = transaction.total_value();
        let quantity = current.quantity.checked_sub(sell_quantity)?;

        match current.average_cost() {
            Some(avg_cost) => {
                let cost_removed = avg_cost.checked_mul(sell_quantity)?;
                let gain = sell_value.checked_sub(cost_removed)?;
                let next = OpenPosition {
                    quantity,
                    cost_basis: current.cost_basis.checked_sub(cost_removed)?,
                };
                state.realized_gains = state.realized_gains.checked_add(gain)?;
                state.positions.insert(transaction.ticker().to_string(), next);

                if quantity < Decimal::ZERO {
                    let message = format!("Sale leaves open quantity at {}", quantity);
                    state.warnings.push(LedgerWarning::new(
                        LedgerWarningKind::Oversell,
                        transaction,
                        message,
                    ));
                }
            }
            None => {
                state.realized_gains = state.realized_gains.checked_add(sell_value)?;
                state.positions.insert(
                    transaction.ticker().to_string(),
                    OpenPosition { quantity, ..current },
                );
                let message = format!(
                    "Sold {} shares with no open position; booking full proceeds {} as gain",
                    sell_quantity, sell_value
                );
                state.warnings.push(LedgerWarning::new(
                    LedgerWarningKind::Oversell,
                    transaction,
                    message,
                ));
            }
        }
        Some(())
    }
}
