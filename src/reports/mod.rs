// Reports module - return calculation and account comparison

pub mod comparison;
pub mod performance;

pub use comparison::{compare_portfolios, evaluate_portfolio, AccountPerformance, ComparisonReport};
pub use performance::{
    compute_total_return, compute_xirr, solve_xirr, summarize_cash_flows, CashFlowSummary,
    XirrOutcome,
};
