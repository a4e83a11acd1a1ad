use std::collections::BTreeMap;
use std::io::Write;

use rust_decimal::Decimal;
use stockfolio_core::constants::DISPLAY_DECIMAL_PRECISION;
use stockfolio_core::{Holding, PortfolioSummary, PortfolioValuation, Transaction};

use crate::cli::OutputFormat;
use crate::commands::CommandOutput;
use crate::error::CliError;

const RULE_WIDTH: usize = 60;
const SHARE_DECIMAL_PRECISION: u32 = 4;

pub fn render(
    output: &CommandOutput,
    format: OutputFormat,
    pretty: bool,
    out: &mut impl Write,
) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => {
            let payload = if pretty {
                serde_json::to_string_pretty(output)?
            } else {
                serde_json::to_string(output)?
            };
            writeln!(out, "{payload}")?;
        }
        OutputFormat::Table => render_table(output, out)?,
    }
    Ok(())
}

fn render_table(output: &CommandOutput, out: &mut impl Write) -> Result<(), CliError> {
    match output {
        CommandOutput::Recorded(transaction) => writeln!(out, "Recorded: {transaction}")?,
        CommandOutput::StockAdded(stock) => writeln!(out, "Added stock: {stock}")?,
        CommandOutput::Summary(summary) => render_summary(summary, out)?,
        CommandOutput::Holdings(holdings) => render_holdings(holdings, out)?,
        CommandOutput::Transactions {
            ticker,
            transactions,
        } => render_transactions(ticker.as_deref(), transactions, out)?,
        CommandOutput::Valuation(valuation) => render_valuation(valuation, out)?,
        CommandOutput::Cleared { name } => writeln!(out, "Cleared portfolio '{name}'")?,
    }
    Ok(())
}

fn money(value: Decimal) -> String {
    let rounded = value.round_dp(DISPLAY_DECIMAL_PRECISION);
    let precision = DISPLAY_DECIMAL_PRECISION as usize;
    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-${:.*}", precision, rounded.abs())
    } else {
        format!("${:.*}", precision, rounded.abs())
    }
}

fn shares(value: Decimal) -> String {
    value.round_dp(SHARE_DECIMAL_PRECISION).normalize().to_string()
}

fn percent(value: Option<Decimal>) -> String {
    match value {
        Some(pct) => format!(
            "{:.*}%",
            DISPLAY_DECIMAL_PRECISION as usize,
            pct.round_dp(DISPLAY_DECIMAL_PRECISION)
        ),
        None => "n/a".to_string(),
    }
}

fn heading(title: &str, out: &mut impl Write) -> std::io::Result<()> {
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;
    writeln!(out, "{title}")?;
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))
}

fn render_summary(summary: &PortfolioSummary, out: &mut impl Write) -> std::io::Result<()> {
    heading("PORTFOLIO SUMMARY", out)?;
    writeln!(out, "Portfolio Name:        {}", summary.name)?;
    writeln!(out, "Total Holdings:        {} stocks", summary.total_holdings)?;
    writeln!(out, "Total Transactions:    {}", summary.total_transactions)?;
    writeln!(out)?;
    writeln!(out, "Total Cost Basis:      {}", money(summary.total_cost_basis))?;
    writeln!(out, "Realized Gains/Losses: {}", money(summary.realized_gains))?;
    writeln!(out, "Dividend Income:       {}", money(summary.dividend_income))?;
    writeln!(out, "Total Return:          {}", money(summary.total_return))?;
    if summary.return_pct.is_some() {
        writeln!(out, "Return %:              {}", percent(summary.return_pct))?;
    }
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))
}

fn render_holdings(
    holdings: &BTreeMap<String, Holding>,
    out: &mut impl Write,
) -> std::io::Result<()> {
    heading("CURRENT HOLDINGS", out)?;
    if holdings.is_empty() {
        return writeln!(out, "No current holdings.");
    }

    writeln!(
        out,
        "{:<10} {:>12} {:>14} {:>16}",
        "Ticker", "Shares", "Avg Cost", "Total Cost"
    )?;
    writeln!(out, "{}", "-".repeat(RULE_WIDTH))?;
    for holding in holdings.values() {
        writeln!(
            out,
            "{:<10} {:>12} {:>14} {:>16}",
            holding.ticker,
            shares(holding.quantity),
            money(holding.average_cost),
            money(holding.total_cost)
        )?;
    }
    let total_cost: Decimal = holdings.values().map(|h| h.total_cost).sum();
    writeln!(out, "{}", "-".repeat(RULE_WIDTH))?;
    writeln!(out, "{:<10} {:>12} {:>14} {:>16}", "TOTAL", "", "", money(total_cost))
}

fn render_transactions(
    ticker: Option<&str>,
    transactions: &[Transaction],
    out: &mut impl Write,
) -> std::io::Result<()> {
    match ticker {
        Some(ticker) => heading(&format!("TRANSACTIONS FOR {ticker}"), out)?,
        None => heading("ALL TRANSACTIONS", out)?,
    }
    if transactions.is_empty() {
        return match ticker {
            Some(ticker) => writeln!(out, "No transactions found for {ticker}."),
            None => writeln!(out, "No transactions recorded."),
        };
    }
    for (index, transaction) in transactions.iter().enumerate() {
        writeln!(out, "{}. {}", index + 1, transaction)?;
    }
    Ok(())
}

fn render_valuation(valuation: &PortfolioValuation, out: &mut impl Write) -> std::io::Result<()> {
    heading(&format!("MARKET VALUE: {}", valuation.name), out)?;
    if valuation.holdings.is_empty() {
        return writeln!(out, "No current holdings.");
    }

    writeln!(
        out,
        "{:<8} {:>10} {:>12} {:>12} {:>14} {:>14} {:>9}",
        "Ticker", "Shares", "Avg Cost", "Price", "Market Value", "Unrealized", "Gain %"
    )?;
    for holding in &valuation.holdings {
        let price = if holding.price_available {
            money(holding.current_price)
        } else {
            "n/a".to_string()
        };
        writeln!(
            out,
            "{:<8} {:>10} {:>12} {:>12} {:>14} {:>14} {:>9}",
            holding.ticker,
            shares(holding.quantity),
            money(holding.average_cost),
            price,
            money(holding.market_value),
            money(holding.unrealized_gain),
            percent(holding.unrealized_gain_pct)
        )?;
    }
    writeln!(out, "{}", "-".repeat(RULE_WIDTH))?;
    writeln!(out, "Total Market Value:   {}", money(valuation.total_market_value))?;
    writeln!(out, "Total Cost Basis:     {}", money(valuation.total_cost_basis))?;
    writeln!(
        out,
        "Unrealized Gain:      {} ({})",
        money(valuation.total_unrealized_gain),
        percent(valuation.total_unrealized_gain_pct)
    )?;
    if !valuation.unpriced_tickers.is_empty() {
        writeln!(
            out,
            "No price available for: {}",
            valuation.unpriced_tickers.join(", ")
        )?;
    }
    writeln!(
        out,
        "Valued at {}",
        valuation.valued_at.format("%Y-%m-%d %H:%M:%S UTC")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use stockfolio_core::{Portfolio, TransactionType};

    fn rendered(output: &CommandOutput, format: OutputFormat) -> String {
        let mut buffer = Vec::new();
        render(output, format, false, &mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    fn sample_portfolio() -> Portfolio {
        let mut portfolio = Portfolio::new("Demo");
        for (kind, qty, price) in [
            (TransactionType::Buy, dec!(50), dec!(150)),
            (TransactionType::Buy, dec!(25), dec!(155)),
            (TransactionType::Sell, dec!(25), dec!(165)),
        ] {
            portfolio.add_transaction(Transaction::new("AAPL", kind, qty, price).unwrap());
        }
        portfolio
    }

    #[test]
    fn test_money_formatting() {
        assert_eq!(money(dec!(333.3333)), "$333.33");
        assert_eq!(money(dec!(-12.5)), "-$12.50");
        assert_eq!(money(dec!(-0.001)), "$0.00");
        assert_eq!(shares(dec!(75.00000)), "75");
        assert_eq!(percent(None), "n/a");
        assert_eq!(percent(Some(dec!(2.9304))), "2.93%");
    }

    #[test]
    fn test_summary_table() {
        let summary = sample_portfolio().get_portfolio_summary();
        let text = rendered(&CommandOutput::Summary(summary), OutputFormat::Table);
        assert!(text.contains("PORTFOLIO SUMMARY"));
        assert!(text.contains("Portfolio Name:        Demo"));
        assert!(text.contains("Total Holdings:        1 stocks"));
        assert!(text.contains("Realized Gains/Losses: $333.33"));
        assert!(text.contains("Total Cost Basis:      $7583.33"));
    }

    #[test]
    fn test_holdings_table() {
        let holdings = sample_portfolio().get_holdings();
        let text = rendered(&CommandOutput::Holdings(holdings), OutputFormat::Table);
        let row = text.lines().find(|l| l.starts_with("AAPL")).unwrap();
        assert!(row.contains("50"));
        assert!(row.contains("$151.67"));
        assert!(text.lines().any(|l| l.starts_with("TOTAL")));

        let empty = rendered(&CommandOutput::Holdings(BTreeMap::new()), OutputFormat::Table);
        assert!(empty.contains("No current holdings."));
    }

    #[test]
    fn test_transactions_are_numbered() {
        let portfolio = sample_portfolio();
        let output = CommandOutput::Transactions {
            ticker: Some("AAPL".to_string()),
            transactions: portfolio.transactions().to_vec(),
        };
        let text = rendered(&output, OutputFormat::Table);
        assert!(text.contains("TRANSACTIONS FOR AAPL"));
        assert!(text.contains("1. BUY 50 shares of AAPL @ $150.00"));
        assert!(text.contains("3. SELL 25 shares of AAPL @ $165.00"));

        let none = CommandOutput::Transactions {
            ticker: Some("TSLA".to_string()),
            transactions: Vec::new(),
        };
        assert!(rendered(&none, OutputFormat::Table).contains("No transactions found for TSLA."));
    }

    #[test]
    fn test_json_envelope() {
        let holdings = sample_portfolio().get_holdings();
        let text = rendered(&CommandOutput::Holdings(holdings), OutputFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["kind"], "holdings");
        assert_eq!(value["data"]["AAPL"]["quantity"], 50);

        let cleared = CommandOutput::Cleared {
            name: "Demo".to_string(),
        };
        let value: serde_json::Value =
            serde_json::from_str(&rendered(&cleared, OutputFormat::Json)).unwrap();
        assert_eq!(value["kind"], "cleared");
        assert_eq!(value["data"]["name"], "Demo");
    }
}
