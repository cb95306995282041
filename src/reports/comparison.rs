use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;

use super::performance::{compute_total_return, solve_xirr, summarize_cash_flows, XirrOutcome};
use crate::models::Portfolio;

/// Performance figures for one account
#[derive(Debug, Clone, Serialize)]
pub struct AccountPerformance {
    pub account: String,
    pub xirr: f64,
    pub xirr_outcome: XirrOutcome,
    pub simple_return: f64,
    pub valuation: Decimal,
    pub valuation_date: NaiveDate,
    pub total_in: Decimal,
    pub total_out: Decimal,
    pub net_invested: Decimal,
    pub flow_count: usize,
}

impl AccountPerformance {
    /// (annualized, simple) pair handed to the chart and table
    pub fn rates(&self) -> (f64, f64) {
        (self.xirr, self.simple_return)
    }

    pub fn profit(&self) -> Decimal {
        self.valuation - self.net_invested
    }
}

/// Account name to performance, in the order accounts were evaluated
#[derive(Debug, Clone, Default, Serialize)]
pub struct ComparisonReport {
    pub accounts: Vec<AccountPerformance>,
}

impl ComparisonReport {
    pub fn get(&self, account: &str) -> Option<&AccountPerformance> {
        self.accounts.iter().find(|a| a.account == account)
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AccountPerformance> {
        self.accounts.iter()
    }
}

pub fn evaluate_portfolio(portfolio: &Portfolio) -> AccountPerformance {
    let outcome = solve_xirr(portfolio);
    let simple_return = compute_total_return(portfolio);
    let summary = summarize_cash_flows(portfolio.cash_flows());

    info!(
        "{}: {} flows, valuation {} on {}, xirr {:?}, simple {:.4}",
        portfolio.identifier(),
        summary.flow_count,
        portfolio.valuation_amount(),
        portfolio.valuation_date(),
        outcome,
        simple_return
    );

    AccountPerformance {
        account: portfolio.identifier().to_string(),
        xirr: outcome.rate_or_zero(),
        xirr_outcome: outcome,
        simple_return,
        valuation: portfolio.valuation_amount(),
        valuation_date: portfolio.valuation_date(),
        total_in: summary.total_in,
        total_out: summary.total_out,
        net_invested: summary.net_invested,
        flow_count: summary.flow_count,
    }
}

pub fn compare_portfolios(portfolios: &[Portfolio]) -> ComparisonReport {
    ComparisonReport {
        accounts: portfolios.iter().map(evaluate_portfolio).collect(),
    }
}
