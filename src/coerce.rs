//! Column type coercion for raw delimited tables.
//!
//! Mirrors the cleaning pass the upstream order exports receive: duplicate
//! rows are dropped first, then each column is tried against an ordered list
//! of interpretations (currency-tolerant number, then calendar date, then
//! plain text). A column adopts the first interpretation that accepts every
//! non-empty cell; empty cells are nulls under any interpretation and never
//! veto a kind. Nothing in this pass raises: parse failures step down to the
//! next interpretation and the final fallback keeps the text verbatim.

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use encoding_rs::Encoding;
use serde::Serialize;

use crate::{
    data::{Value, parse_currency_number, parse_date_like},
    io_utils,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Number,
    Date,
    Text,
}

impl ColumnKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnKind::Number => "number",
            ColumnKind::Date => "date",
            ColumnKind::Text => "text",
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A decoded delimited file before any typing: headers plus string rows.
#[derive(Debug, Clone)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn read(path: &Path, delimiter: u8, encoding: &'static Encoding) -> Result<Self> {
        let mut reader = io_utils::open_csv_reader_from_path(path, delimiter)?;
        let headers = io_utils::reader_headers(&mut reader, encoding)?;
        let mut rows = Vec::new();
        for (row_idx, record) in reader.byte_records().enumerate() {
            let record = record
                .with_context(|| format!("Reading row {} in {path:?}", row_idx + 2))?;
            let decoded = io_utils::decode_record(&record, encoding)?;
            rows.push(decoded);
        }
        Ok(Self { headers, rows })
    }

    /// Removes rows identical across all columns, keeping first occurrences
    /// in order. Returns how many rows were dropped.
    pub fn dedupe(&mut self) -> usize {
        let before = self.rows.len();
        let mut seen: HashSet<Vec<String>> = HashSet::with_capacity(before);
        self.rows.retain(|row| seen.insert(row.clone()));
        before - self.rows.len()
    }
}

/// The result of the coercion pass: per-column kinds and typed cells.
/// `rows[r][c]` is `None` where the source cell was empty or fell outside the
/// column's adopted interpretation.
#[derive(Debug, Clone)]
pub struct CoercedTable {
    pub headers: Vec<String>,
    pub kinds: Vec<ColumnKind>,
    pub rows: Vec<Vec<Option<Value>>>,
}

impl CoercedTable {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// First non-null cell of a column, rendered for display.
    pub fn sample_value(&self, column: usize) -> Option<String> {
        self.rows
            .iter()
            .filter_map(|row| row.get(column).and_then(|cell| cell.as_ref()))
            .map(Value::as_display)
            .next()
    }
}

/// Applies the ordered per-column heuristic to a deduplicated table.
pub fn coerce_table(raw: RawTable) -> CoercedTable {
    let column_count = raw.headers.len();
    let kinds: Vec<ColumnKind> = (0..column_count)
        .map(|idx| decide_column_kind(&raw.rows, idx))
        .collect();

    let rows = raw
        .rows
        .into_iter()
        .map(|row| {
            (0..column_count)
                .map(|idx| {
                    let cell = row.get(idx).map(String::as_str).unwrap_or("");
                    coerce_cell(cell, kinds[idx])
                })
                .collect()
        })
        .collect();

    CoercedTable {
        headers: raw.headers,
        kinds,
        rows,
    }
}

fn decide_column_kind(rows: &[Vec<String>], column: usize) -> ColumnKind {
    let mut saw_value = false;
    let mut all_numeric = true;
    let mut all_dates = true;

    for row in rows {
        let cell = row.get(column).map(String::as_str).unwrap_or("");
        let trimmed = cell.trim();
        if trimmed.is_empty() {
            continue;
        }
        saw_value = true;
        if all_numeric && parse_currency_number(trimmed).is_err() {
            all_numeric = false;
        }
        if all_dates && parse_date_like(trimmed).is_err() {
            all_dates = false;
        }
        if !all_numeric && !all_dates {
            break;
        }
    }

    if !saw_value {
        ColumnKind::Text
    } else if all_numeric {
        ColumnKind::Number
    } else if all_dates {
        ColumnKind::Date
    } else {
        ColumnKind::Text
    }
}

fn coerce_cell(cell: &str, kind: ColumnKind) -> Option<Value> {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return None;
    }
    match kind {
        ColumnKind::Number => parse_currency_number(trimmed).ok().map(Value::Number),
        ColumnKind::Date => parse_date_like(trimmed).ok().map(Value::Date),
        ColumnKind::Text => Some(Value::Text(cell.to_string())),
    }
}
