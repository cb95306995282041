//! isa-perf - investment account performance from broker statements
//!
//! This library reads Moneyfarm and Interactive Investor PDF statements,
//! normalizes them into dated cash flows plus a terminal valuation, and
//! computes the annualized (XIRR) and simple total return of each account.

pub mod chart;
pub mod config;
pub mod error;
pub mod importers;
pub mod models;
pub mod reports;
pub mod utils;
