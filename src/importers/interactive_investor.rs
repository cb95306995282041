// Interactive Investor statement reader
//
// Statements are named like "Statement 2025-09-30.pdf". The summary row
// "Total Portfolio Value £ 16,001.66 £ 1,830.18 £ 17,831.84" carries
// securities, cash and the account total; the last figure is the total.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use std::path::Path;
use tracing::{debug, info, warn};

use super::{
    file_name_of, list_statement_files, parse_amount, PortfolioBuilder, Provider,
    StatementReader, TextExtractor,
};
use crate::models::{CashFlow, Portfolio};

static FILE_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{4}-\d{2}-\d{2})").expect("valid file date regex"));

static SUMMARY_VALUE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)Total Portfolio Value.*£\s*([\d,]+\.\d{2})\s*$")
        .expect("valid summary value regex")
});

static ACCOUNT_VALUE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)Total Account Value\s*£?\s*([\d,]+\.\d{2})")
        .expect("valid account value regex")
});

static TRANSACTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{1,2} [A-Za-z]{3} \d{4})\s+(.*?)\s+£?\s*([\d,]+\.\d{2})")
        .expect("valid transaction regex")
});

pub struct InteractiveInvestorReader<'a> {
    extractor: &'a dyn TextExtractor,
}

impl<'a> InteractiveInvestorReader<'a> {
    pub fn new(extractor: &'a dyn TextExtractor) -> Self {
        Self { extractor }
    }
}

impl StatementReader for InteractiveInvestorReader<'_> {
    fn provider(&self) -> Provider {
        Provider::InteractiveInvestor
    }

    fn read_all(&self, directory: &Path) -> Result<Portfolio> {
        let mut builder = PortfolioBuilder::new(self.provider().account_name());

        for path in list_statement_files(directory)? {
            let text = self.extractor.extract_text(&path).with_context(|| {
                format!("Failed to read Interactive Investor statement {:?}", path)
            })?;
            apply_statement(&mut builder, &file_name_of(&path), &text);
        }

        let portfolio = builder.build();
        info!(
            "Interactive Investor: {} cash flows, valuation {} as of {}",
            portfolio.cash_flows().len(),
            portfolio.valuation_amount(),
            portfolio.valuation_date()
        );
        Ok(portfolio)
    }
}

/// Statement date embedded in the file name as YYYY-MM-DD
pub fn date_from_file_name(file_name: &str) -> Option<NaiveDate> {
    let caps = FILE_DATE_RE.captures(file_name)?;
    match NaiveDate::parse_from_str(&caps[1], "%Y-%m-%d") {
        Ok(d) => Some(d),
        Err(e) => {
            warn!("Ignoring invalid date '{}' in {}: {}", &caps[1], file_name, e);
            None
        }
    }
}

/// Total account value, preferring the portfolio summary row
fn total_account_value(text: &str) -> Option<Decimal> {
    let caps = SUMMARY_VALUE_RE
        .captures(text)
        .or_else(|| ACCOUNT_VALUE_RE.captures(text))?;
    match parse_amount(&caps[1]) {
        Ok(v) => Some(v),
        Err(e) => {
            warn!("Skipping account value: {}", e);
            None
        }
    }
}

/// Fold one statement's text into the portfolio being built
pub fn apply_statement(builder: &mut PortfolioBuilder, file_name: &str, text: &str) {
    let file_date = date_from_file_name(file_name).unwrap_or(builder.latest_date());

    if let Some(value) = total_account_value(text) {
        builder.record_valuation(file_date, value);
    } else {
        debug!("{}: no account value found", file_name);
    }

    for line in text.split('\n') {
        if let Some(flow) = parse_transaction_line(line, file_name) {
            builder.push_flow(flow);
        }
    }
}

fn parse_transaction_line(line: &str, file_name: &str) -> Option<CashFlow> {
    let caps = TRANSACTION_RE.captures(line)?;
    let description = caps[2].trim();
    let upper = description.to_uppercase();
    if !upper.contains("SUBSCRIPTION") && !upper.contains("WITHDRAWAL") {
        return None;
    }

    let date = match NaiveDate::parse_from_str(&caps[1], "%d %b %Y") {
        Ok(d) => d,
        Err(e) => {
            warn!("{}: skipping row with bad date '{}': {}", file_name, &caps[1], e);
            return None;
        }
    };
    let amount = match parse_amount(&caps[3]) {
        Ok(a) => a,
        Err(e) => {
            warn!("{}: skipping row: {}", file_name, e);
            return None;
        }
    };

    let signed = if upper.contains("SUBSCRIPTION") {
        -amount
    } else {
        amount
    };
    Some(CashFlow::new(date, signed, description))
}
