//! Cash-flow model shared by the statement readers and the return calculator

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

/// A dated, signed money movement on an account.
///
/// Negative amounts are contributions (money paid into the account),
/// positive amounts are withdrawals (money taken out).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CashFlow {
    date: NaiveDate,
    amount: Decimal,
    label: String,
}

impl CashFlow {
    pub fn new(date: NaiveDate, amount: Decimal, label: impl Into<String>) -> Self {
        Self {
            date,
            amount,
            label: label.into(),
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_contribution(&self) -> bool {
        self.amount < Decimal::ZERO
    }
}

/// Snapshot of one account: its external cash flows plus its worth at a single date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Portfolio {
    identifier: String,
    cash_flows: Vec<CashFlow>,
    valuation_amount: Decimal,
    valuation_date: NaiveDate,
}

impl Portfolio {
    pub fn new(
        identifier: impl Into<String>,
        cash_flows: Vec<CashFlow>,
        valuation_amount: Decimal,
        valuation_date: NaiveDate,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            cash_flows,
            valuation_amount,
            valuation_date,
        }
    }

    /// Same portfolio under a different account name (config overrides)
    pub fn renamed(self, identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            ..self
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn cash_flows(&self) -> &[CashFlow] {
        &self.cash_flows
    }

    pub fn valuation_amount(&self) -> Decimal {
        self.valuation_amount
    }

    pub fn valuation_date(&self) -> NaiveDate {
        self.valuation_date
    }

    /// Cash flows dated after the valuation date; XIRR assumes there are none.
    pub fn flows_after_valuation(&self) -> impl Iterator<Item = &CashFlow> {
        self.cash_flows
            .iter()
            .filter(move |cf| cf.date > self.valuation_date)
    }
}
