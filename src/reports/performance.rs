//! Return calculator: money-weighted annualized return (XIRR) and simple total return
//!
//! Both public calculations are total functions. Degenerate input and
//! root-finding failures collapse to `0.0`; [`solve_xirr`] keeps the
//! distinction for callers that need it.

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use crate::models::{CashFlow, Portfolio};

/// Starting point for the Newton iteration (10% a year)
pub const INITIAL_GUESS: f64 = 0.10;

/// Average calendar year length, so leap years are spread evenly
pub const DAYS_PER_YEAR: f64 = 365.25;

const MAX_NEWTON_ITERATIONS: usize = 100;
const MAX_BISECTION_ITERATIONS: usize = 200;
const STEP_TOLERANCE: f64 = 1e-9;

// Bracket candidates for the bisection fallback, ordered by rate.
// -100% itself is excluded because (1 + r) must stay positive.
const BRACKET_GRID: [f64; 19] = [
    -0.9999, -0.999, -0.99, -0.95, -0.9, -0.75, -0.5, -0.25, 0.0, 0.1, 0.25, 0.5, 1.0, 2.0, 5.0,
    10.0, 25.0, 50.0, 100.0,
];

/// Outcome of solving for the annualized rate
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum XirrOutcome {
    /// A rate zeroing the net present value was found
    Rate(f64),
    /// Fewer than two flows once the valuation is included
    InsufficientData,
    /// Neither Newton nor bisection found a root
    NoConvergence,
}

impl XirrOutcome {
    pub fn rate(&self) -> Option<f64> {
        match self {
            XirrOutcome::Rate(r) => Some(*r),
            _ => None,
        }
    }

    /// Collapse to the "unknown return = 0%" convention
    pub fn rate_or_zero(&self) -> f64 {
        self.rate().unwrap_or(0.0)
    }
}

/// A dated amount as seen by the root-finder
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DatedAmount {
    pub date: NaiveDate,
    pub amount: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CashFlowSummary {
    pub total_in: Decimal,  // Sum of contributions, as a positive figure
    pub total_out: Decimal, // Sum of withdrawals
    pub net_invested: Decimal,
    pub flow_count: usize,
}

impl CashFlowSummary {
    /// Gain over the money that stayed invested
    pub fn profit(&self, valuation: Decimal) -> Decimal {
        valuation - self.net_invested
    }
}

/// Summarize cash flows into money in / money out
pub fn summarize_cash_flows(flows: &[CashFlow]) -> CashFlowSummary {
    let mut total_in = Decimal::ZERO;
    let mut total_out = Decimal::ZERO;

    for flow in flows {
        if flow.is_contribution() {
            total_in += flow.amount().abs();
        } else {
            total_out += flow.amount();
        }
    }

    CashFlowSummary {
        total_in,
        total_out,
        net_invested: total_in - total_out,
        flow_count: flows.len(),
    }
}

/// Cash flows followed by the valuation as a positive terminal flow.
///
/// The valuation is current worth rather than a transaction, so it is
/// always counted as money received whatever sign it was stored with.
pub fn xirr_flows(portfolio: &Portfolio) -> Vec<DatedAmount> {
    let mut flows: Vec<DatedAmount> = portfolio
        .cash_flows()
        .iter()
        .map(|cf| DatedAmount {
            date: cf.date(),
            amount: cf.amount().to_f64().unwrap_or(0.0),
        })
        .collect();

    flows.push(DatedAmount {
        date: portfolio.valuation_date(),
        amount: portfolio.valuation_amount().abs().to_f64().unwrap_or(0.0),
    });

    flows
}

fn year_fraction(anchor: NaiveDate, date: NaiveDate) -> f64 {
    (date - anchor).num_days() as f64 / DAYS_PER_YEAR
}

fn anchor_date(flows: &[DatedAmount]) -> Option<NaiveDate> {
    flows.iter().map(|f| f.date).min()
}

/// Net present value of `flows` at annual `rate`, discounted to the earliest flow date.
///
/// Returns `None` when `1 + rate` is not positive or the sum overflows.
pub fn xnpv(flows: &[DatedAmount], rate: f64) -> Option<f64> {
    let anchor = anchor_date(flows)?;
    npv_and_slope(flows, anchor, rate).map(|(npv, _)| npv)
}

fn npv_and_slope(flows: &[DatedAmount], anchor: NaiveDate, rate: f64) -> Option<(f64, f64)> {
    let base = 1.0 + rate;
    if !(base > 0.0 && base.is_finite()) {
        return None;
    }

    let mut npv = 0.0;
    let mut slope = 0.0;
    for flow in flows {
        let t = year_fraction(anchor, flow.date);
        let discount = base.powf(-t);
        npv += flow.amount * discount;
        // d/dr [a * (1+r)^-t] = -t * a * (1+r)^(-t-1)
        slope -= t * flow.amount * discount / base;
    }

    (npv.is_finite() && slope.is_finite()).then_some((npv, slope))
}

fn newton(flows: &[DatedAmount], anchor: NaiveDate, guess: f64) -> Option<f64> {
    let mut rate = guess;
    for _ in 0..MAX_NEWTON_ITERATIONS {
        let (npv, slope) = npv_and_slope(flows, anchor, rate)?;
        if npv == 0.0 {
            return Some(rate);
        }
        if slope == 0.0 {
            return None;
        }

        let next = rate - npv / slope;
        if !next.is_finite() || next <= -1.0 {
            return None;
        }
        if (next - rate).abs() < STEP_TOLERANCE {
            return Some(next);
        }
        rate = next;
    }
    None
}

fn bisect(flows: &[DatedAmount], anchor: NaiveDate, mut lo: f64, mut hi: f64) -> Option<f64> {
    let (mut npv_lo, _) = npv_and_slope(flows, anchor, lo)?;
    for _ in 0..MAX_BISECTION_ITERATIONS {
        let mid = lo + (hi - lo) / 2.0;
        let (npv_mid, _) = npv_and_slope(flows, anchor, mid)?;
        if npv_mid == 0.0 || (hi - lo) / 2.0 < STEP_TOLERANCE {
            return Some(mid);
        }
        if npv_mid.signum() == npv_lo.signum() {
            lo = mid;
            npv_lo = npv_mid;
        } else {
            hi = mid;
        }
    }
    Some(lo + (hi - lo) / 2.0)
}

/// Search the bracket grid for a sign change, preferring the one nearest the
/// initial guess, then bisect inside it.
fn bracket_and_bisect(flows: &[DatedAmount], anchor: NaiveDate) -> Option<f64> {
    let samples: Vec<(f64, f64)> = BRACKET_GRID
        .iter()
        .filter_map(|&r| npv_and_slope(flows, anchor, r).map(|(npv, _)| (r, npv)))
        .collect();

    if let Some(&(r, _)) = samples.iter().find(|(_, npv)| *npv == 0.0) {
        return Some(r);
    }

    let (lo, hi) = samples
        .windows(2)
        .filter(|w| w[0].1.signum() != w[1].1.signum())
        .map(|w| (w[0].0, w[1].0))
        .min_by(|a, b| {
            let da = (INITIAL_GUESS - (a.0 + a.1) / 2.0).abs();
            let db = (INITIAL_GUESS - (b.0 + b.1) / 2.0).abs();
            da.total_cmp(&db)
        })?;

    bisect(flows, anchor, lo, hi)
}

/// Solve for the annualized rate zeroing the portfolio's net present value.
pub fn solve_xirr(portfolio: &Portfolio) -> XirrOutcome {
    let flows = xirr_flows(portfolio);
    if flows.len() < 2 {
        return XirrOutcome::InsufficientData;
    }

    debug!(
        "XIRR cash flows for {}: {:?}",
        portfolio.identifier(),
        flows
            .iter()
            .map(|f| (f.date, f.amount))
            .collect::<Vec<_>>()
    );

    let Some(anchor) = anchor_date(&flows) else {
        return XirrOutcome::InsufficientData;
    };

    if let Some(rate) = newton(&flows, anchor, INITIAL_GUESS) {
        return XirrOutcome::Rate(rate);
    }

    debug!(
        "Newton iteration failed for {}, falling back to bisection",
        portfolio.identifier()
    );
    match bracket_and_bisect(&flows, anchor) {
        Some(rate) => XirrOutcome::Rate(rate),
        None => XirrOutcome::NoConvergence,
    }
}

/// Money-weighted annualized return; `0.0` when it cannot be determined.
pub fn compute_xirr(portfolio: &Portfolio) -> f64 {
    solve_xirr(portfolio).rate_or_zero()
}

/// Profit over net invested capital, ignoring timing; `0.0` when nothing is net invested.
pub fn compute_total_return(portfolio: &Portfolio) -> f64 {
    let summary = summarize_cash_flows(portfolio.cash_flows());
    if summary.net_invested.is_zero() {
        return 0.0;
    }

    summary
        .profit(portfolio.valuation_amount())
        .checked_div(summary.net_invested)
        .and_then(|r| r.to_f64())
        .unwrap_or(0.0)
}
