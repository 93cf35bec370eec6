//! Numeric coercion for noisy amount cells.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::Value;

/// Characters stripped from amount text before parsing: thousands
/// separators (ASCII and full-width) and currency marks.
const NOISE: &[char] = &[',', '，', '¥', '￥'];

/// Largest magnitude accepted for a single cell.
///
/// Larger values read as unparseable. Sums and differences of bounded
/// cells stay far inside `Decimal`'s range, so draft arithmetic never
/// overflows.
pub fn max_amount() -> Decimal {
    Decimal::new(1_000_000_000_000_000, 0)
}

/// The outcome of reading one amount cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsedAmount {
    /// A number.
    Value(Decimal),
    /// Null or empty text.
    Blank,
    /// Text that is not a number, or a number beyond [`max_amount`].
    Unparseable,
}

impl ParsedAmount {
    /// The amount, with blank and unparseable cells as zero.
    pub fn or_zero(self) -> Decimal {
        match self {
            ParsedAmount::Value(amount) => amount,
            ParsedAmount::Blank | ParsedAmount::Unparseable => Decimal::ZERO,
        }
    }
}

/// Reads an amount cell without ever failing.
pub fn parse_amount(value: &Value) -> ParsedAmount {
    match read_cell(value) {
        ParsedAmount::Value(amount) if amount.abs() > max_amount() => ParsedAmount::Unparseable,
        parsed => parsed,
    }
}

fn read_cell(value: &Value) -> ParsedAmount {
    match value {
        Value::Null => ParsedAmount::Blank,
        Value::Number(n) => match n.as_i64() {
            Some(i) => ParsedAmount::Value(Decimal::from(i)),
            None => parse_text(&n.to_string()),
        },
        Value::String(s) => parse_text(s),
        Value::Bool(_) | Value::Array(_) | Value::Object(_) => ParsedAmount::Unparseable,
    }
}

/// Coerces an amount cell to a number; anything non-numeric becomes zero.
///
/// # Example
///
/// ```
/// use payroll_import::normalize::coerce_amount;
/// use rust_decimal::Decimal;
/// use serde_json::json;
///
/// assert_eq!(coerce_amount(&json!(" 5,000.50 ")), Decimal::new(500050, 2));
/// assert_eq!(coerce_amount(&json!("n/a")), Decimal::ZERO);
/// ```
pub fn coerce_amount(value: &Value) -> Decimal {
    parse_amount(value).or_zero()
}

fn parse_text(text: &str) -> ParsedAmount {
    let cleaned: String = text
        .chars()
        .filter(|c| !c.is_whitespace() && !NOISE.contains(c))
        .collect();

    if cleaned.is_empty() {
        return ParsedAmount::Blank;
    }

    Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .map(ParsedAmount::Value)
        .unwrap_or(ParsedAmount::Unparseable)
}
