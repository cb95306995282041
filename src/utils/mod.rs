//! Utility functions for formatting money and rates
//!
//! Centralizes how sterling amounts and percentage returns are displayed
//! in tables, charts and the flows preview.

use rust_decimal::Decimal;

/// Currency symbol options for formatting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurrencySymbol {
    /// Include "£" prefix (Pound sterling)
    GBP,
    /// No currency symbol (for table cells, calculations display)
    None,
}

/// Core formatting function with full control over output.
///
/// Formats a Decimal value using UK conventions:
/// - Thousands separator: `,` (comma)
/// - Decimal separator: `.` (period)
/// - Sign goes before the symbol: `-£500.00`
///
/// # Examples
/// ```
/// use isa_perf::utils::{format_currency_with_width, CurrencySymbol};
/// use rust_decimal_macros::dec;
///
/// assert_eq!(
///     format_currency_with_width(dec!(1234.56), 0, CurrencySymbol::GBP),
///     "£1,234.56"
/// );
///
/// assert_eq!(
///     format_currency_with_width(dec!(1234), 12, CurrencySymbol::None),
///     "    1,234.00"
/// );
/// ```
pub fn format_currency_with_width(value: Decimal, width: usize, symbol: CurrencySymbol) -> String {
    let rounded = value.round_dp(2);
    let is_negative = rounded < Decimal::ZERO;

    let formatted = format!("{:.2}", rounded.abs());
    let (integer_part, decimal_part) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));

    // Add thousands separators (,) to integer part
    let with_separators: String = integer_part
        .chars()
        .rev()
        .enumerate()
        .flat_map(|(i, c)| {
            if i > 0 && i % 3 == 0 {
                vec![',', c]
            } else {
                vec![c]
            }
        })
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();

    let sign = if is_negative { "-" } else { "" };
    let prefix = match symbol {
        CurrencySymbol::GBP => "£",
        CurrencySymbol::None => "",
    };

    let result = format!("{}{}{}.{}", sign, prefix, with_separators, decimal_part);

    // Right-align; pad by chars since "£" is two bytes
    let len = result.chars().count();
    if width > len {
        format!("{}{}", " ".repeat(width - len), result)
    } else {
        result
    }
}

/// Format as sterling with symbol: "£1,234.56"
///
/// # Examples
/// ```
/// use isa_perf::utils::format_currency;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(format_currency(dec!(1234.56)), "£1,234.56");
/// assert_eq!(format_currency(dec!(-500)), "-£500.00");
/// ```
pub fn format_currency(value: Decimal) -> String {
    format_currency_with_width(value, 0, CurrencySymbol::GBP)
}

/// Format number only (no symbol): "1,234.56"
pub fn format_amount(value: Decimal) -> String {
    format_currency_with_width(value, 0, CurrencySymbol::None)
}

/// Format a fractional rate as a percentage with two decimals: 0.1234 -> "12.34%"
///
/// # Examples
/// ```
/// use isa_perf::utils::format_pct;
///
/// assert_eq!(format_pct(0.538695), "53.87%");
/// assert_eq!(format_pct(-0.05), "-5.00%");
/// ```
pub fn format_pct(rate: f64) -> String {
    let pct = rate * 100.0;
    // Avoid printing "-0.00%"
    let pct = if pct.abs() < 0.005 { 0.0 } else { pct };
    format!("{:.2}%", pct)
}

/// One-decimal percentage for chart labels: 0.1234 -> "12.3%"
pub fn format_pct_short(rate: f64) -> String {
    let pct = rate * 100.0;
    let pct = if pct.abs() < 0.05 { 0.0 } else { pct };
    format!("{:.1}%", pct)
}
