// Import module - statement readers for Moneyfarm and Interactive Investor PDFs

pub mod interactive_investor;
pub mod moneyfarm;
pub mod pdf_text;

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use itertools::Itertools;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info};

use crate::error::StatementError;
use crate::models::{CashFlow, Portfolio};

pub use interactive_investor::InteractiveInvestorReader;
pub use moneyfarm::MoneyfarmReader;
pub use pdf_text::{PdfTextExtractor, TextExtractor};

/// Statement formats understood by the readers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provider {
    Moneyfarm,
    InteractiveInvestor,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Moneyfarm => "moneyfarm",
            Provider::InteractiveInvestor => "interactive_investor",
        }
    }

    /// Account name used when the config doesn't give one
    pub fn account_name(&self) -> &'static str {
        match self {
            Provider::Moneyfarm => "Moneyfarm",
            Provider::InteractiveInvestor => "Interactive Investor",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().replace(['-', ' '], "_").as_str() {
            "moneyfarm" => Ok(Provider::Moneyfarm),
            "interactive_investor" | "ii" => Ok(Provider::InteractiveInvestor),
            _ => Err(anyhow!(
                "Unknown provider '{}'. Supported providers: moneyfarm, interactive_investor",
                s
            )),
        }
    }
}

/// Builds a portfolio from every statement in a directory
pub trait StatementReader {
    fn provider(&self) -> Provider;

    fn read_all(&self, directory: &Path) -> Result<Portfolio>;
}

/// Reader for `provider`, extracting text through `extractor`
pub fn reader_for<'a>(
    provider: Provider,
    extractor: &'a dyn TextExtractor,
) -> Box<dyn StatementReader + 'a> {
    match provider {
        Provider::Moneyfarm => Box::new(MoneyfarmReader::new(extractor)),
        Provider::InteractiveInvestor => Box::new(InteractiveInvestorReader::new(extractor)),
    }
}

/// PDF files in `directory`, sorted by file name
pub fn list_statement_files(directory: &Path) -> Result<Vec<PathBuf>> {
    if !directory.is_dir() {
        return Err(StatementError::MissingDirectory(directory.to_path_buf()).into());
    }

    let entries = std::fs::read_dir(directory)
        .with_context(|| format!("Failed to list statements in {:?}", directory))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry?.path();
        let is_pdf = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("pdf"));
        if is_pdf && path.is_file() {
            files.push(path);
        }
    }

    let files = files
        .into_iter()
        .sorted_by_key(|p| p.file_name().map(|n| n.to_os_string()))
        .collect::<Vec<_>>();

    info!("Found {} statements in {:?}", files.len(), directory);
    Ok(files)
}

/// File name as text, for filename date fallbacks
pub(crate) fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Parse a statement amount such as "£1,234.56" or "2,000"
pub fn parse_amount(s: &str) -> Result<Decimal> {
    let cleaned: String = s
        .trim()
        .trim_start_matches('£')
        .trim()
        .chars()
        .filter(|c| *c != ',')
        .collect();

    Decimal::from_str(&cleaned)
        .map_err(|_| StatementError::ParseError(format!("invalid amount '{}'", s)).into())
}

/// Date a portfolio starts from before any statement supplies one
pub fn epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default()
}

/// Accumulates cash flows and the latest valuation across statements.
///
/// Flows are keyed on (date, amount to 2dp) so transactions repeated in
/// overlapping statement periods are only counted once.
#[derive(Debug)]
pub struct PortfolioBuilder {
    identifier: String,
    cash_flows: Vec<CashFlow>,
    seen: HashSet<(NaiveDate, Decimal)>,
    latest_value: Decimal,
    latest_date: NaiveDate,
}

impl PortfolioBuilder {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            cash_flows: Vec::new(),
            seen: HashSet::new(),
            latest_value: Decimal::ZERO,
            latest_date: epoch(),
        }
    }

    pub fn latest_date(&self) -> NaiveDate {
        self.latest_date
    }

    /// Record a valuation; it replaces the current one when its date is not
    /// older, so for equal dates the last statement processed wins.
    pub fn record_valuation(&mut self, date: NaiveDate, value: Decimal) -> bool {
        if date >= self.latest_date {
            debug!("{}: valuation {} as of {}", self.identifier, value, date);
            self.latest_date = date;
            self.latest_value = value;
            true
        } else {
            false
        }
    }

    /// Add a flow unless one with the same date and amount was already seen
    pub fn push_flow(&mut self, flow: CashFlow) -> bool {
        let key = (flow.date(), flow.amount().round_dp(2));
        if !self.seen.insert(key) {
            debug!(
                "{}: skipping duplicate flow {} {}",
                self.identifier,
                flow.date(),
                flow.amount()
            );
            return false;
        }
        self.cash_flows.push(flow);
        true
    }

    pub fn build(self) -> Portfolio {
        Portfolio::new(
            self.identifier,
            self.cash_flows,
            self.latest_value,
            self.latest_date,
        )
    }
}
