//! Performance comparison chart
//!
//! Draws one pair of horizontal bars per account (annualized XIRR and simple
//! total return), labeled with the percentage. Negative returns are drawn in
//! red with a lighter glyph. The same series can be written out as JSON for
//! an external renderer.

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use std::path::Path;
use tracing::info;
use unicode_width::UnicodeWidthStr;

use crate::reports::ComparisonReport;
use crate::utils::format_pct_short;

pub const CHART_TITLE: &str = "ISA Performance Comparison";
pub const XIRR_LABEL: &str = "Annualized (XIRR)";
pub const SIMPLE_LABEL: &str = "Total Return (Simple)";

const POSITIVE_GLYPH: &str = "█";
const NEGATIVE_GLYPH: &str = "▒";

/// Chart data in percent, one entry per account
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub title: String,
    pub y_label: String,
    pub labels: Vec<String>,
    pub xirr_pct: Vec<f64>,
    pub simple_pct: Vec<f64>,
}

pub fn chart_series(report: &ComparisonReport) -> ChartSeries {
    ChartSeries {
        title: CHART_TITLE.to_string(),
        y_label: "Percentage Return (%)".to_string(),
        labels: report.iter().map(|a| a.account.clone()).collect(),
        xirr_pct: report.iter().map(|a| a.xirr * 100.0).collect(),
        simple_pct: report.iter().map(|a| a.simple_return * 100.0).collect(),
    }
}

/// Write the chart series as pretty JSON
pub fn write_chart_data(report: &ComparisonReport, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(&chart_series(report))?;
    std::fs::write(path, json).with_context(|| format!("Failed to write chart data to {:?}", path))?;
    info!("Chart data saved to {:?}", path);
    Ok(())
}

fn bar_len(pct: f64, max_abs: f64, width: usize) -> usize {
    if max_abs <= 0.0 || !pct.is_finite() {
        return 0;
    }
    ((pct.abs() / max_abs) * width as f64).round() as usize
}

fn pad_to(text: &str, width: usize) -> String {
    let pad = width.saturating_sub(text.width());
    format!("{}{}", text, " ".repeat(pad))
}

fn draw_bar(pct: f64, max_abs: f64, width: usize, positive_color: colored::Color) -> String {
    let len = bar_len(pct, max_abs, width);
    let label = format_pct_short(pct / 100.0);
    if pct < 0.0 {
        format!("{} {}", NEGATIVE_GLYPH.repeat(len).red(), label.red())
    } else {
        format!("{} {}", POSITIVE_GLYPH.repeat(len).color(positive_color), label.bold())
    }
}

/// Render the comparison as a bar chart; `width` is the longest bar in cells
pub fn render_bar_chart(report: &ComparisonReport, width: usize) -> String {
    let series = chart_series(report);
    let max_abs = series
        .xirr_pct
        .iter()
        .chain(&series.simple_pct)
        .filter(|v| v.is_finite())
        .map(|v| v.abs())
        .fold(0.0_f64, f64::max);

    let name_width = series.labels.iter().map(|l| l.width()).max().unwrap_or(0);
    let label_width = XIRR_LABEL.width().max(SIMPLE_LABEL.width());

    let mut out = String::new();
    out.push_str(&format!("\n{}\n\n", CHART_TITLE.bold()));

    for (i, name) in series.labels.iter().enumerate() {
        let rows = [
            (XIRR_LABEL, series.xirr_pct[i], colored::Color::Blue),
            (SIMPLE_LABEL, series.simple_pct[i], colored::Color::Green),
        ];
        for (row, (label, pct, color)) in rows.into_iter().enumerate() {
            let first_col = if row == 0 { name.as_str() } else { "" };
            out.push_str(&format!(
                "  {}  {}  {}\n",
                pad_to(first_col, name_width),
                pad_to(label, label_width),
                draw_bar(pct, max_abs, width, color)
            ));
        }
        out.push('\n');
    }

    out
}
