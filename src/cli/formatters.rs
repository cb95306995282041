//! Output formatting module for CLI display
//!
//! This module handles all terminal output formatting, separating
//! the concerns of return calculation from presentation.

use colored::Colorize;
use isa_perf::models::Portfolio;
use isa_perf::reports::{summarize_cash_flows, ComparisonReport, XirrOutcome};
use isa_perf::utils::{format_currency, format_pct};
use serde::Serialize;
use tabled::{
    settings::{object::Columns, Alignment, Style},
    Table, Tabled,
};

fn colored_pct(rate: f64) -> String {
    let text = format_pct(rate);
    if rate >= 0.0 {
        text.green().to_string()
    } else {
        text.red().to_string()
    }
}

/// Format the comparison for JSON output
pub fn format_comparison_json(report: &ComparisonReport) -> String {
    serde_json::to_string_pretty(report)
        .unwrap_or_else(|e| format!(r#"{{"error": "JSON serialization failed: {}"}}"#, e))
}

/// Format the comparison as a results table
pub fn format_comparison_table(report: &ComparisonReport) -> String {
    let mut output = String::new();
    output.push_str(&format!("\n{} Results\n\n", "📈".cyan().bold()));

    #[derive(Tabled)]
    struct ResultRow {
        #[tabled(rename = "Account")]
        account: String,
        #[tabled(rename = "Annualized (XIRR)")]
        xirr: String,
        #[tabled(rename = "Total Return (Simple)")]
        simple: String,
        #[tabled(rename = "Net Invested")]
        net_invested: String,
        #[tabled(rename = "Value")]
        value: String,
        #[tabled(rename = "As Of")]
        as_of: String,
    }

    let rows: Vec<ResultRow> = report
        .iter()
        .map(|a| {
            let xirr = match a.xirr_outcome {
                XirrOutcome::Rate(r) => colored_pct(r),
                // Shown as 0% like the calculator reports it, flagged for the reader
                XirrOutcome::InsufficientData => format!("{} (no data)", format_pct(0.0)),
                XirrOutcome::NoConvergence => format!("{} (no fit)", format_pct(0.0)),
            };
            ResultRow {
                account: a.account.clone(),
                xirr,
                simple: colored_pct(a.simple_return),
                net_invested: format_currency(a.net_invested),
                value: format_currency(a.valuation),
                as_of: a.valuation_date.format("%d %b %Y").to_string(),
            }
        })
        .collect();

    let mut table = Table::new(&rows);
    table.with(Style::modern());
    // Right-align all columns except Account (0)
    table.modify(Columns::new(1..), Alignment::right());

    output.push_str(&table.to_string());
    output.push('\n');
    output
}

/// Format one account's normalized cash flows
pub fn format_flows_table(portfolio: &Portfolio) -> String {
    let mut output = String::new();
    output.push_str(&format!(
        "\n{} {} - {} cash flows\n\n",
        "💰".cyan().bold(),
        portfolio.identifier().bold(),
        portfolio.cash_flows().len()
    ));

    #[derive(Tabled)]
    struct FlowRow {
        #[tabled(rename = "Date")]
        date: String,
        #[tabled(rename = "Description")]
        label: String,
        #[tabled(rename = "Amount")]
        amount: String,
    }

    let rows: Vec<FlowRow> = portfolio
        .cash_flows()
        .iter()
        .map(|cf| {
            let amount = format_currency(cf.amount());
            FlowRow {
                date: cf.date().format("%Y-%m-%d").to_string(),
                label: cf.label().to_string(),
                amount: if cf.is_contribution() {
                    amount.green().to_string()
                } else {
                    amount.red().to_string()
                },
            }
        })
        .collect();

    if rows.is_empty() {
        output.push_str(&format!("{} No deposits or withdrawals found\n", "ℹ".blue().bold()));
    } else {
        let mut table = Table::new(&rows);
        table.with(Style::modern());
        table.modify(Columns::new(2..), Alignment::right());
        output.push_str(&table.to_string());
        output.push('\n');
    }

    let summary = summarize_cash_flows(portfolio.cash_flows());
    output.push_str(&format!("\n{} Summary", "━".repeat(60).bright_black()));
    output.push_str(&format!(
        "\n{:<16} {}",
        "Paid in:".bold(),
        format_currency(summary.total_in)
    ));
    output.push_str(&format!(
        "\n{:<16} {}",
        "Withdrawn:".bold(),
        format_currency(summary.total_out)
    ));
    output.push_str(&format!(
        "\n{:<16} {}",
        "Net invested:".bold(),
        format_currency(summary.net_invested)
    ));
    output.push_str(&format!(
        "\n{:<16} {} as of {}\n",
        "Value:".bold(),
        format_currency(portfolio.valuation_amount()),
        portfolio.valuation_date()
    ));

    output
}

/// Format one account's normalized cash flows for JSON output
pub fn format_flows_json(portfolio: &Portfolio) -> String {
    #[derive(Serialize)]
    struct JsonFlows<'a> {
        #[serde(flatten)]
        portfolio: &'a Portfolio,
        total_in: String,
        total_out: String,
        net_invested: String,
    }

    let summary = summarize_cash_flows(portfolio.cash_flows());
    let payload = JsonFlows {
        portfolio,
        total_in: summary.total_in.to_string(),
        total_out: summary.total_out.to_string(),
        net_invested: summary.net_invested.to_string(),
    };

    serde_json::to_string_pretty(&payload)
        .unwrap_or_else(|e| format!(r#"{{"error": "JSON serialization failed: {}"}}"#, e))
}

/// Format the message shown when no account could be read
pub fn format_no_accounts() -> String {
    format!(
        "{} No statements could be read\nCheck the account directories in your config or pass one with: {} --config <file>\n",
        "ℹ".blue().bold(),
        "isa-perf".bold()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use isa_perf::models::CashFlow;
    use isa_perf::reports::compare_portfolios;
    use rust_decimal_macros::dec;

    fn sample_portfolio() -> Portfolio {
        Portfolio::new(
            "Moneyfarm",
            vec![CashFlow::new(
                NaiveDate::from_ymd_opt(2023, 11, 3).unwrap(),
                dec!(-2000),
                "Bank input",
            )],
            dec!(3077.39),
            NaiveDate::from_ymd_opt(2023, 12, 31).unwrap(),
        )
    }

    #[test]
    fn test_comparison_table_lists_accounts() {
        colored::control::set_override(false);
        let report = compare_portfolios(&[sample_portfolio()]);
        let table = format_comparison_table(&report);
        assert!(table.contains("Moneyfarm"));
        assert!(table.contains("53.87%"));
        assert!(table.contains("£3,077.39"));
        assert!(table.contains("31 Dec 2023"));
    }

    #[test]
    fn test_flows_json_has_summary() {
        let json = format_flows_json(&sample_portfolio());
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["identifier"], "Moneyfarm");
        assert_eq!(value["net_invested"], "2000");
        assert_eq!(value["cash_flows"][0]["label"], "Bank input");
    }

    #[test]
    fn test_no_accounts_message() {
        let msg = format_no_accounts();
        assert!(msg.contains("No statements could be read"));
        assert!(msg.contains("--config"));
    }
}
