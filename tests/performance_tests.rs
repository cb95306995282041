//! Return calculator properties
//!
//! These tests exercise the public calculator API:
//! - Degenerate input maps to 0.0
//! - Known XIRR results for simple and mid-year deposit scenarios
//! - Simple return ignores timing
//! - Repeated calls are bit-identical
//! - Sign convention round trip against the profit figure

use chrono::{Days, NaiveDate};
use isa_perf::models::{CashFlow, Portfolio};
use isa_perf::reports::{
    compute_total_return, compute_xirr, solve_xirr, summarize_cash_flows, XirrOutcome,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn flow(on: NaiveDate, amount: Decimal) -> CashFlow {
    CashFlow::new(on, amount, "test")
}

#[test]
fn test_fewer_than_two_flows_is_zero() {
    let empty = Portfolio::new("Empty", vec![], dec!(0), date(1970, 1, 1));
    assert_eq!(compute_xirr(&empty), 0.0);

    let only_value = Portfolio::new("Value", vec![], dec!(17831.84), date(2025, 9, 30));
    assert_eq!(compute_xirr(&only_value), 0.0);
    assert_eq!(solve_xirr(&only_value), XirrOutcome::InsufficientData);
}

#[test]
fn test_zero_net_invested_is_zero() {
    let p = Portfolio::new(
        "Round trip",
        vec![
            flow(date(2023, 1, 10), dec!(-1000)),
            flow(date(2023, 4, 10), dec!(-250)),
            flow(date(2023, 9, 1), dec!(1250)),
        ],
        dec!(75.10),
        date(2024, 1, 1),
    );
    assert_eq!(compute_total_return(&p), 0.0);
}

#[test]
fn test_single_deposit_ten_percent_over_one_average_year() {
    // Four average years is a whole number of days, so compound back to one
    let start = date(2019, 3, 1);
    let end = start + Days::new(1461);
    let p = Portfolio::new("Ten", vec![flow(start, dec!(-1000))], dec!(1464.10), end);
    assert!((compute_xirr(&p) - 0.10).abs() < 1e-4);

    // Calendar year (365 days) is within tolerance of the 365.25-day year
    let p = Portfolio::new(
        "Ten",
        vec![flow(date(2023, 1, 1), dec!(-1000))],
        dec!(1100),
        date(2024, 1, 1),
    );
    assert!((compute_xirr(&p) - 0.10).abs() < 1e-4);
}

#[test]
fn test_two_deposits_rate_between_six_and_eight_percent() {
    let start = date(2023, 1, 1);
    let p = Portfolio::new(
        "Two deposits",
        vec![
            flow(start, dec!(-1000)),
            flow(start + Days::new(181), dec!(-1000)),
        ],
        dec!(2100),
        start + Days::new(365),
    );
    let rate = compute_xirr(&p);
    assert!(rate > 0.06 && rate < 0.08, "rate was {}", rate);
}

#[test]
fn test_total_return_ignores_timing() {
    let original = Portfolio::new(
        "A",
        vec![
            flow(date(2022, 1, 5), dec!(-1500)),
            flow(date(2022, 7, 5), dec!(-500)),
            flow(date(2023, 2, 5), dec!(200)),
        ],
        dec!(2400),
        date(2024, 1, 1),
    );
    let reshuffled = Portfolio::new(
        "A",
        vec![
            flow(date(2023, 11, 30), dec!(200)),
            flow(date(2021, 3, 1), dec!(-500)),
            flow(date(2023, 6, 15), dec!(-1500)),
        ],
        dec!(2400),
        date(2024, 1, 1),
    );
    assert_eq!(
        compute_total_return(&original),
        compute_total_return(&reshuffled)
    );
}

#[test]
fn test_total_return_moneyfarm_figures() {
    let p = Portfolio::new(
        "Moneyfarm",
        vec![
            flow(date(2023, 11, 3), dec!(-1000)),
            flow(date(2023, 11, 17), dec!(-1000)),
        ],
        dec!(3077.39),
        date(2023, 12, 31),
    );
    let expected = (3077.39 - 2000.0) / 2000.0;
    assert!((compute_total_return(&p) - expected).abs() < 1e-12);
    assert!((compute_total_return(&p) - 0.538695).abs() < 1e-12);
}

#[test]
fn test_calculations_are_idempotent() {
    let p = Portfolio::new(
        "Repeat",
        vec![
            flow(date(2021, 5, 4), dec!(-3000)),
            flow(date(2022, 5, 4), dec!(-2000)),
            flow(date(2023, 1, 20), dec!(750)),
        ],
        dec!(5123.45),
        date(2024, 3, 31),
    );
    assert_eq!(compute_xirr(&p).to_bits(), compute_xirr(&p).to_bits());
    assert_eq!(
        compute_total_return(&p).to_bits(),
        compute_total_return(&p).to_bits()
    );
}

#[test]
fn test_sign_convention_round_trip() {
    let flows = vec![
        flow(date(2023, 1, 1), dec!(-2000)),
        flow(date(2023, 5, 1), dec!(-700)),
        flow(date(2023, 8, 1), dec!(450.25)),
    ];
    let valuation = dec!(2600);
    let summary = summarize_cash_flows(&flows);

    let by_sum: Decimal = flows.iter().map(|f| f.amount()).sum::<Decimal>() + valuation;
    let by_partition = valuation - (summary.total_in - summary.total_out);
    assert_eq!(by_sum, by_partition);
    assert_eq!(by_sum, summary.profit(valuation));
}

#[test]
fn test_loss_making_account_has_negative_rates() {
    let p = Portfolio::new(
        "Down",
        vec![flow(date(2022, 1, 1), dec!(-5000))],
        dec!(4000),
        date(2023, 1, 1),
    );
    assert!(compute_xirr(&p) < 0.0);
    assert!((compute_total_return(&p) + 0.2).abs() < 1e-12);
}
