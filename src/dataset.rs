//! The canonical in-memory dataset.
//!
//! Loading goes: decode and read the delimited file, drop duplicate rows,
//! run column coercion, then apply name-keyed normalization so the business
//! columns are always usable downstream:
//!
//! * `Order Date` is strictly re-parsed as a date; cells that fail stay null
//!   rather than aborting the load.
//! * `Sales`, `Profit`, `Discount`, `Quantity` are guaranteed numeric; cells
//!   that fail numeric interpretation and nulls become 0.
//! * The categorical columns are guaranteed text; nulls become `Unknown`.
//!
//! Columns outside that list keep whatever kind coercion gave them. A missing
//! business column logs a warning and default-fills instead of failing, so
//! partial exports still load.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use log::{info, warn};
use serde::Serialize;

use crate::{
    coerce::{CoercedTable, ColumnKind, RawTable, coerce_table},
    data::{Value, parse_date_like, parse_plain_number},
    io_utils,
};

pub const DEFAULT_DATASET_FILE: &str = "superstore.csv";
pub const UNKNOWN_LABEL: &str = "Unknown";

pub const COL_ORDER_DATE: &str = "Order Date";
pub const COL_SALES: &str = "Sales";
pub const COL_PROFIT: &str = "Profit";
pub const COL_DISCOUNT: &str = "Discount";
pub const COL_QUANTITY: &str = "Quantity";
pub const COL_REGION: &str = "Region";
pub const COL_STATE: &str = "State";
pub const COL_CITY: &str = "City";
pub const COL_CATEGORY: &str = "Category";
pub const COL_SUB_CATEGORY: &str = "Sub-Category";
pub const COL_SEGMENT: &str = "Segment";
pub const COL_CUSTOMER_ID: &str = "Customer ID";

pub const NUMERIC_COLUMNS: [&str; 4] = [COL_SALES, COL_PROFIT, COL_DISCOUNT, COL_QUANTITY];
pub const CATEGORICAL_COLUMNS: [&str; 7] = [
    COL_REGION,
    COL_STATE,
    COL_CITY,
    COL_CATEGORY,
    COL_SUB_CATEGORY,
    COL_SEGMENT,
    COL_CUSTOMER_ID,
];

/// Reader-side options carried from the CLI or config file.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    pub delimiter: Option<u8>,
    pub encoding: Option<String>,
}

/// One cleaned order row. Every field is safe to use without further checks;
/// only the order date stays optional.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Order {
    pub order_date: Option<NaiveDate>,
    pub sales: f64,
    pub profit: f64,
    pub discount: f64,
    pub quantity: i64,
    pub region: String,
    pub state: String,
    pub city: String,
    pub category: String,
    pub sub_category: String,
    pub segment: String,
    pub customer_id: String,
}

/// Coercion verdict for one source column, kept for reporting.
#[derive(Debug, Clone, Serialize)]
pub struct ColumnProfile {
    pub name: String,
    pub kind: ColumnKind,
    pub non_null: usize,
    pub sample: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Dataset {
    pub path: PathBuf,
    pub orders: Vec<Order>,
    pub columns: Vec<ColumnProfile>,
    pub duplicates_removed: usize,
}

impl Dataset {
    pub fn load(path: &Path, options: &LoadOptions) -> Result<Self> {
        let delimiter = io_utils::resolve_input_delimiter(path, options.delimiter);
        let encoding = io_utils::resolve_encoding(options.encoding.as_deref())?;
        let mut raw = RawTable::read(path, delimiter, encoding)
            .with_context(|| format!("Loading dataset {path:?}"))?;
        let duplicates = raw.dedupe();
        if duplicates > 0 {
            info!("Dropped {duplicates} duplicate rows from {path:?}");
        }
        let table = coerce_table(raw);
        Ok(Self::from_table(path.to_path_buf(), table, duplicates))
    }

    /// Normalizes an already-coerced table into orders. Pure so the cleanup
    /// rules can be tested without touching disk.
    pub fn from_table(path: PathBuf, table: CoercedTable, duplicates_removed: usize) -> Self {
        let columns: Vec<ColumnProfile> = table
            .headers
            .iter()
            .enumerate()
            .map(|(idx, name)| ColumnProfile {
                name: name.clone(),
                kind: table.kinds[idx],
                non_null: table
                    .rows
                    .iter()
                    .filter(|row| row.get(idx).is_some_and(Option::is_some))
                    .count(),
                sample: table.sample_value(idx),
            })
            .collect();

        for name in std::iter::once(COL_ORDER_DATE)
            .chain(NUMERIC_COLUMNS)
            .chain(CATEGORICAL_COLUMNS)
        {
            if table.column_index(name).is_none() {
                warn!("Column '{name}' is missing from {path:?}; defaults applied");
            }
        }

        let date_idx = table.column_index(COL_ORDER_DATE);
        let sales_idx = table.column_index(COL_SALES);
        let profit_idx = table.column_index(COL_PROFIT);
        let discount_idx = table.column_index(COL_DISCOUNT);
        let quantity_idx = table.column_index(COL_QUANTITY);
        let region_idx = table.column_index(COL_REGION);
        let state_idx = table.column_index(COL_STATE);
        let city_idx = table.column_index(COL_CITY);
        let category_idx = table.column_index(COL_CATEGORY);
        let sub_category_idx = table.column_index(COL_SUB_CATEGORY);
        let segment_idx = table.column_index(COL_SEGMENT);
        let customer_idx = table.column_index(COL_CUSTOMER_ID);

        let orders = table
            .rows
            .iter()
            .map(|row| Order {
                order_date: date_cell(row, date_idx),
                sales: numeric_cell(row, sales_idx),
                profit: numeric_cell(row, profit_idx),
                discount: numeric_cell(row, discount_idx),
                quantity: numeric_cell(row, quantity_idx).round() as i64,
                region: categorical_cell(row, region_idx),
                state: categorical_cell(row, state_idx),
                city: categorical_cell(row, city_idx),
                category: categorical_cell(row, category_idx),
                sub_category: categorical_cell(row, sub_category_idx),
                segment: categorical_cell(row, segment_idx),
                customer_id: categorical_cell(row, customer_idx),
            })
            .collect();

        Self {
            path,
            orders,
            columns,
            duplicates_removed,
        }
    }

    pub fn row_count(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

fn cell<'a>(row: &'a [Option<Value>], idx: Option<usize>) -> Option<&'a Value> {
    idx.and_then(|i| row.get(i)).and_then(Option::as_ref)
}

fn date_cell(row: &[Option<Value>], idx: Option<usize>) -> Option<NaiveDate> {
    cell(row, idx).and_then(|value| match value {
        Value::Date(date) => Some(*date),
        Value::Text(text) => parse_date_like(text.trim()).ok(),
        Value::Number(_) => None,
    })
}

fn numeric_cell(row: &[Option<Value>], idx: Option<usize>) -> f64 {
    cell(row, idx)
        .map(|value| match value {
            Value::Number(number) => *number,
            Value::Text(text) => parse_plain_number(text.trim()).unwrap_or(0.0),
            Value::Date(_) => 0.0,
        })
        .unwrap_or(0.0)
}

fn categorical_cell(row: &[Option<Value>], idx: Option<usize>) -> String {
    cell(row, idx)
        .map(Value::as_display)
        .unwrap_or_else(|| UNKNOWN_LABEL.to_string())
}
