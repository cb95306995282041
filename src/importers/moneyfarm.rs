// Moneyfarm quarterly statement reader
//
// Statements are named like "23_q4.pdf". The valuation sits on a
// "Total account value At 31 December 2023 £3,077.39" style line, and
// transactions are rows of "2023-11-03 Bank input £2,000.00".

use anyhow::{Context, Result};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;
use tracing::{info, warn};

use super::{
    file_name_of, list_statement_files, parse_amount, PortfolioBuilder, Provider,
    StatementReader, TextExtractor,
};
use crate::models::{CashFlow, Portfolio};

static QUARTER_FILE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{2})_q(\d)").expect("valid quarter file regex"));

static VALUE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"£?\s*([\d,]+\.\d{2})").expect("valid value regex"));

static AS_OF_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bat\s+(\d{1,2}\s+[A-Za-z]+\s+\d{4})").expect("valid as-of regex")
});

static TRANSACTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{4}-\d{2}-\d{2})\s+(.*?)\s+£\s*([\d,]+(?:\.\d{2})?)")
        .expect("valid transaction regex")
});

const VALUATION_MARKERS: [&str; 2] = ["Total account value", "Total investments value"];

// The amount can wrap onto the lines following the marker
const VALUATION_WINDOW: usize = 5;

const FLOW_KEYWORDS: [&str; 3] = ["bank input", "subscription", "withdrawal"];

pub struct MoneyfarmReader<'a> {
    extractor: &'a dyn TextExtractor,
}

impl<'a> MoneyfarmReader<'a> {
    pub fn new(extractor: &'a dyn TextExtractor) -> Self {
        Self { extractor }
    }
}

impl StatementReader for MoneyfarmReader<'_> {
    fn provider(&self) -> Provider {
        Provider::Moneyfarm
    }

    fn read_all(&self, directory: &Path) -> Result<Portfolio> {
        let mut builder = PortfolioBuilder::new(self.provider().account_name());

        for path in list_statement_files(directory)? {
            let text = self
                .extractor
                .extract_text(&path)
                .with_context(|| format!("Failed to read Moneyfarm statement {:?}", path))?;
            apply_statement(&mut builder, &file_name_of(&path), &text);
        }

        let portfolio = builder.build();
        info!(
            "Moneyfarm: {} cash flows, valuation {} as of {}",
            portfolio.cash_flows().len(),
            portfolio.valuation_amount(),
            portfolio.valuation_date()
        );
        Ok(portfolio)
    }
}

/// Quarter-end date encoded in a "YY_qN" file name
pub fn quarter_end_from_file_name(file_name: &str) -> Option<NaiveDate> {
    let caps = QUARTER_FILE_RE.captures(file_name)?;
    let year = 2000 + caps[1].parse::<i32>().ok()?;
    let (month, day) = match &caps[2] {
        "1" => (3, 31),
        "2" => (6, 30),
        "3" => (9, 30),
        "4" => (12, 31),
        other => {
            warn!("Ignoring unknown quarter 'q{}' in {}", other, file_name);
            return None;
        }
    };
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Fold one statement's text into the portfolio being built
pub fn apply_statement(builder: &mut PortfolioBuilder, file_name: &str, text: &str) {
    let file_date = quarter_end_from_file_name(file_name).unwrap_or(builder.latest_date());

    let lines: Vec<&str> = text.split('\n').collect();
    for (i, line) in lines.iter().enumerate() {
        if !VALUATION_MARKERS.iter().any(|m| line.contains(m)) {
            continue;
        }

        let end = (i + VALUATION_WINDOW).min(lines.len());
        let chunk = lines[i..end].join(" ");
        let Some(caps) = VALUE_RE.captures(&chunk) else {
            continue;
        };

        match parse_amount(&caps[1]) {
            Ok(value) => {
                let as_of = as_of_date(line).unwrap_or(file_date);
                builder.record_valuation(as_of, value);
            }
            Err(e) => warn!("{}: skipping valuation: {}", file_name, e),
        }
    }

    for flow in parse_transactions(text, file_name) {
        builder.push_flow(flow);
    }
}

/// "At 31 December 2023" on the valuation line itself
fn as_of_date(line: &str) -> Option<NaiveDate> {
    let caps = AS_OF_RE.captures(line)?;
    let raw = caps[1].split_whitespace().collect::<Vec<_>>().join(" ");
    NaiveDate::parse_from_str(&raw, "%d %B %Y").ok()
}

fn parse_transactions(text: &str, file_name: &str) -> Vec<CashFlow> {
    let mut flows = Vec::new();

    for caps in TRANSACTION_RE.captures_iter(text) {
        let description = caps[2].trim();
        let lower = description.to_lowercase();
        if !FLOW_KEYWORDS.iter().any(|k| lower.contains(k)) {
            continue;
        }

        let date = match NaiveDate::parse_from_str(&caps[1], "%Y-%m-%d") {
            Ok(d) => d,
            Err(e) => {
                warn!("{}: skipping row with bad date '{}': {}", file_name, &caps[1], e);
                continue;
            }
        };
        let amount = match parse_amount(&caps[3]) {
            Ok(a) => a,
            Err(e) => {
                warn!("{}: skipping row: {}", file_name, e);
                continue;
            }
        };

        let is_deposit = lower.contains("input") || lower.contains("subscription");
        let signed = if is_deposit { -amount } else { amount };
        flows.push(CashFlow::new(date, signed, description));
    }

    flows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::importers::pdf_text::fake::FakeExtractor;
    use rust_decimal_macros::dec;
    use tempfile::TempDir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn statements_dir(files: &[&str]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for name in files {
            std::fs::write(dir.path().join(name), "dummy").unwrap();
        }
        dir
    }

    #[test]
    fn test_moneyfarm_reader_parsing() {
        let dir = statements_dir(&["23_q4.pdf"]);
        let text = "
    Total account value At 31 December 2023 £3,077.39

    2023-11-03 Bank input £2,000.00
    2023-11-17 Bank input £700.00
    2023-12-21 Bank input £250.00
    ";
        let extractor = FakeExtractor::with_text(text);
        let portfolio = MoneyfarmReader::new(&extractor).read_all(dir.path()).unwrap();

        assert_eq!(portfolio.identifier(), "Moneyfarm");
        assert_eq!(portfolio.valuation_amount(), dec!(3077.39));
        assert_eq!(portfolio.valuation_date(), date(2023, 12, 31));
        assert_eq!(portfolio.cash_flows().len(), 3);
        assert_eq!(portfolio.cash_flows()[0].amount(), dec!(-2000.00));
        assert_eq!(portfolio.cash_flows()[0].label(), "Bank input");
    }

    #[test]
    fn test_quarter_end_from_file_name() {
        assert_eq!(quarter_end_from_file_name("23_q1.pdf"), Some(date(2023, 3, 31)));
        assert_eq!(quarter_end_from_file_name("24_q2.pdf"), Some(date(2024, 6, 30)));
        assert_eq!(quarter_end_from_file_name("ISA 24_q3.pdf"), Some(date(2024, 9, 30)));
        assert_eq!(quarter_end_from_file_name("24_q4.pdf"), Some(date(2024, 12, 31)));
        assert_eq!(quarter_end_from_file_name("24_q5.pdf"), None);
        assert_eq!(quarter_end_from_file_name("statement.pdf"), None);
    }

    #[test]
    fn test_withdrawal_is_positive_and_other_rows_ignored() {
        let mut builder = PortfolioBuilder::new("Moneyfarm");
        let text = "
2024-02-01 Subscription £500.00
2024-02-10 Withdrawal £120.50
2024-02-15 Management fee £3.20
2024-02-20 Dividend reinvested £12.00
";
        apply_statement(&mut builder, "24_q1.pdf", text);
        let portfolio = builder.build();

        let amounts: Vec<_> = portfolio.cash_flows().iter().map(|f| f.amount()).collect();
        assert_eq!(amounts, vec![dec!(-500.00), dec!(120.50)]);
    }

    #[test]
    fn test_valuation_amount_on_following_line() {
        let mut builder = PortfolioBuilder::new("Moneyfarm");
        let text = "Portfolio summary\nTotal investments value\n\n£12,345.67\nCash £0.00\n";
        apply_statement(&mut builder, "24_q2.pdf", text);
        let portfolio = builder.build();

        assert_eq!(portfolio.valuation_amount(), dec!(12345.67));
        assert_eq!(portfolio.valuation_date(), date(2024, 6, 30));
    }

    #[test]
    fn test_overlapping_statements_keep_latest_value_and_dedup() {
        let dir = statements_dir(&["23_q4.pdf", "24_q1.pdf"]);
        let q4 = "Total account value £3,077.39\n2023-11-03 Bank input £2,000.00\n";
        let q1 = "Total account value £3,500.00\n\
                  2023-11-03 Bank input £2,000.00\n\
                  2024-01-15 Bank input £300.00\n";
        let extractor = FakeExtractor::default()
            .with_file("23_q4.pdf", q4)
            .with_file("24_q1.pdf", q1);

        let portfolio = MoneyfarmReader::new(&extractor).read_all(dir.path()).unwrap();

        assert_eq!(portfolio.valuation_amount(), dec!(3500.00));
        assert_eq!(portfolio.valuation_date(), date(2024, 3, 31));
        assert_eq!(portfolio.cash_flows().len(), 2);
    }

    #[test]
    fn test_file_without_quarter_keeps_latest_date() {
        let mut builder = PortfolioBuilder::new("Moneyfarm");
        apply_statement(&mut builder, "23_q4.pdf", "Total account value £1,000.00\n");
        apply_statement(&mut builder, "extra.pdf", "Total account value £1,010.00\n");
        let portfolio = builder.build();

        assert_eq!(portfolio.valuation_date(), date(2023, 12, 31));
        assert_eq!(portfolio.valuation_amount(), dec!(1010.00));
    }
}
