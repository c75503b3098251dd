use std::fmt;
use std::sync::OnceLock;

use anyhow::{Result, anyhow};
use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

/// A coerced cell value. Columns resolve to exactly one variant; cells that
/// fail the column's interpretation are represented as `None` upstream.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Date(NaiveDate),
    Text(String),
}

impl Value {
    pub fn as_display(&self) -> String {
        match self {
            Value::Number(n) => format_number(*n),
            Value::Date(d) => d.format("%Y-%m-%d").to_string(),
            Value::Text(s) => s.clone(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_display())
    }
}

fn currency_chars() -> &'static Regex {
    static CURRENCY_CHARS: OnceLock<Regex> = OnceLock::new();
    CURRENCY_CHARS.get_or_init(|| Regex::new(r"[$,]").expect("valid literal class"))
}

/// Parses a decimal number after stripping currency formatting (`$`, `,`),
/// the way the source exports embed it ("$1,200" -> 1200.0). Routed through
/// `Decimal` first so ordinary currency literals stay exact, with a plain
/// float parse as the fallback for scientific notation. Literal "NaN" and
/// infinity tokens are rejected; every successful parse is finite.
pub fn parse_currency_number(value: &str) -> Result<f64> {
    let stripped = currency_chars().replace_all(value.trim(), "");
    let token = stripped.trim();
    if token.is_empty() {
        return Err(anyhow!("Empty numeric token in '{value}'"));
    }
    if let Ok(decimal) = token.parse::<Decimal>() {
        return decimal
            .to_f64()
            .ok_or_else(|| anyhow!("Numeric value '{value}' out of f64 range"));
    }
    match token.parse::<f64>() {
        Ok(number) if number.is_finite() => Ok(number),
        _ => Err(anyhow!("Failed to parse '{value}' as number")),
    }
}

/// Plain numeric parse with no currency stripping; the strict reparse used by
/// dataset normalization for the business measure columns. Non-finite tokens
/// parse as `None` so they take the fill defaults like any missing cell.
pub fn parse_plain_number(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(decimal) = trimmed.parse::<Decimal>() {
        return decimal.to_f64();
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|number| number.is_finite())
}

pub fn parse_naive_date(value: &str) -> Result<NaiveDate> {
    // Month-first ahead of day-first for slash and dash forms alike: the
    // order exports this tool targets are US-formatted ("11/08/2016" and
    // "11-08-2016" are both November 8th).
    const DATE_FORMATS: &[&str] = &[
        "%Y-%m-%d",
        "%m/%d/%Y",
        "%d/%m/%Y",
        "%Y/%m/%d",
        "%m-%d-%Y",
        "%d-%m-%Y",
    ];
    for fmt in DATE_FORMATS {
        if let Ok(parsed) = NaiveDate::parse_from_str(value, fmt) {
            return Ok(parsed);
        }
    }
    Err(anyhow!("Failed to parse '{value}' as date"))
}

pub fn parse_naive_datetime(value: &str) -> Result<NaiveDateTime> {
    const DATETIME_FORMATS: &[&str] = &[
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%m/%d/%Y %H:%M:%S",
        "%d/%m/%Y %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
    ];
    for fmt in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, fmt) {
            return Ok(parsed);
        }
    }
    Err(anyhow!("Failed to parse '{value}' as datetime"))
}

/// Calendar interpretation used by column coercion: a bare date, or a
/// datetime truncated to its date.
pub fn parse_date_like(value: &str) -> Result<NaiveDate> {
    if let Ok(date) = parse_naive_date(value) {
        return Ok(date);
    }
    parse_naive_datetime(value).map(|dt| dt.date())
}

pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.4}")
    }
}
