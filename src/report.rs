//! The report command: headline KPIs, grouped profit, category rollups and
//! the state-by-region pivot for one filtered selection.
//!
//! An empty selection is not an error. The command prints a warning and
//! returns success without aggregating, so scripted callers can distinguish
//! "nothing matched" from a broken dataset by exit code.

use anyhow::Result;
use log::warn;
use serde::Serialize;

use crate::{
    aggregate::{Aggregates, GroupTotal},
    cli::{FilterArgs, OutputFormat, ReportArgs},
    config::RunSettings,
    dataset::Dataset,
    error::PipelineError,
    filter::{FilterDomains, Selection},
    table::{self, Align},
};

pub fn execute(args: &ReportArgs) -> Result<()> {
    let settings = RunSettings::resolve(&args.dataset, args.pivot_states)?;
    let dataset = settings.load()?;
    let domains = FilterDomains::scan(&dataset.orders);
    let selection = build_selection(&args.filters, &domains)?;
    let view = selection.apply(&dataset);

    if view.is_empty() {
        warn!("{}", PipelineError::EmptySelection);
        println!("No orders match the current filters; widen the selection.");
        return Ok(());
    }

    let aggregates = Aggregates::compute(&view, settings.pivot_states);
    match args.format {
        OutputFormat::Table => render_text(&dataset, &selection, &aggregates),
        OutputFormat::Json => render_json(&dataset, &selection, &aggregates)?,
    }
    Ok(())
}

/// Turns filter flags into a selection: omitted axes keep the full domain,
/// named values must actually exist in the dataset.
pub fn build_selection(args: &FilterArgs, domains: &FilterDomains) -> Result<Selection> {
    let mut selection = Selection::full(domains);
    if !args.regions.is_empty() {
        selection.regions = args.regions.iter().cloned().collect();
    }
    if !args.categories.is_empty() {
        selection.categories = args.categories.iter().cloned().collect();
    }
    if !args.sub_categories.is_empty() {
        selection.sub_categories = args.sub_categories.iter().cloned().collect();
    }
    if let Some(lo) = args.discount_min {
        selection.discount_min = lo;
    }
    if let Some(hi) = args.discount_max {
        selection.discount_max = hi;
    }
    domains.validate(&selection)?;
    Ok(selection)
}

fn render_text(dataset: &Dataset, selection: &Selection, aggregates: &Aggregates) {
    let kpis = &aggregates.kpis;
    println!(
        "Dataset: {} ({} orders, {} duplicates removed)",
        dataset.path.display(),
        dataset.row_count(),
        dataset.duplicates_removed
    );
    println!(
        "Selection: {} of {} orders, discount {:.2} to {:.2}",
        kpis.orders,
        dataset.row_count(),
        selection.discount_min,
        selection.discount_max
    );
    println!();

    table::print_aligned(
        &["Metric".to_string(), "Value".to_string()],
        &[
            vec!["Total Sales".to_string(), format_usd(kpis.total_sales)],
            vec!["Total Profit".to_string(), format_usd(kpis.total_profit)],
            vec!["Margin".to_string(), format_percent(kpis.margin)],
            vec!["Avg Discount".to_string(), format_percent(kpis.avg_discount)],
        ],
        &[Align::Left, Align::Right],
    );
    println!();

    if let (Some(region), Some(sub_category)) =
        (aggregates.worst_region(), aggregates.worst_sub_category())
    {
        println!(
            "Lowest-profit region: {} ({})",
            region.key,
            format_usd_cents(region.value)
        );
        println!(
            "Lowest-profit sub-category: {} ({})",
            sub_category.key,
            format_usd_cents(sub_category.value)
        );
        println!(
            "Profit scale bound: +/-{}",
            format_usd_cents(aggregates.profit_color_bound)
        );
        println!();
    }

    println!("Profit by region (worst first)");
    print_group_table("Region", "Profit", &aggregates.profit_by_region);
    println!();

    println!("Profit by sub-category (worst first)");
    print_group_table("Sub-Category", "Profit", &aggregates.profit_by_sub_category);
    println!();

    println!("Sales by category (largest first)");
    let category_rows: Vec<Vec<String>> = aggregates
        .sales_by_category
        .iter()
        .map(|entry| {
            vec![
                entry.category.clone(),
                format_usd_cents(entry.sales),
                format_usd_cents(entry.profit),
            ]
        })
        .collect();
    table::print_aligned(
        &[
            "Category".to_string(),
            "Sales".to_string(),
            "Profit".to_string(),
        ],
        &category_rows,
        &[Align::Left, Align::Right, Align::Right],
    );
    println!();

    println!("Category rollup");
    let rollup_rows: Vec<Vec<String>> = aggregates
        .category_rollup
        .iter()
        .map(|entry| {
            vec![
                entry.category.clone(),
                entry.sub_category.clone(),
                format_usd_cents(entry.sales),
                format_usd_cents(entry.profit),
                format_percent(entry.avg_discount),
            ]
        })
        .collect();
    table::print_aligned(
        &[
            "Category".to_string(),
            "Sub-Category".to_string(),
            "Sales".to_string(),
            "Profit".to_string(),
            "Avg Discount".to_string(),
        ],
        &rollup_rows,
        &[
            Align::Left,
            Align::Left,
            Align::Right,
            Align::Right,
            Align::Right,
        ],
    );
    println!();

    let pivot = &aggregates.state_region_pivot;
    if pivot.state_count > pivot.rows.len() {
        println!(
            "State profit by region (worst {} of {} states)",
            pivot.rows.len(),
            pivot.state_count
        );
    } else {
        println!("State profit by region");
    }
    let mut headers = vec!["State".to_string()];
    headers.extend(pivot.regions.iter().cloned());
    headers.push("Total".to_string());
    let rows: Vec<Vec<String>> = pivot
        .rows
        .iter()
        .map(|row| {
            let mut cells = vec![row.state.clone()];
            cells.extend(row.by_region.iter().map(|value| format_usd_cents(*value)));
            cells.push(format_usd_cents(row.total));
            cells
        })
        .collect();
    let mut aligns = vec![Align::Left];
    aligns.extend(std::iter::repeat_n(Align::Right, headers.len() - 1));
    table::print_aligned(&headers, &rows, &aligns);
}

fn print_group_table(key_header: &str, value_header: &str, groups: &[GroupTotal]) {
    let rows: Vec<Vec<String>> = groups
        .iter()
        .map(|group| vec![group.key.clone(), format_usd_cents(group.value)])
        .collect();
    table::print_aligned(
        &[key_header.to_string(), value_header.to_string()],
        &rows,
        &[Align::Left, Align::Right],
    );
}

#[derive(Serialize)]
struct ReportDocument<'a> {
    dataset: String,
    total_orders: usize,
    duplicates_removed: usize,
    selection: &'a Selection,
    #[serde(flatten)]
    aggregates: &'a Aggregates,
}

fn render_json(dataset: &Dataset, selection: &Selection, aggregates: &Aggregates) -> Result<()> {
    let document = ReportDocument {
        dataset: dataset.path.display().to_string(),
        total_orders: dataset.row_count(),
        duplicates_removed: dataset.duplicates_removed,
        selection,
        aggregates,
    };
    println!("{}", serde_json::to_string_pretty(&document)?);
    Ok(())
}

/// Whole dollars with thousands grouping, sign between `$` and the digits.
pub fn format_usd(value: f64) -> String {
    format_money(value, 0)
}

pub fn format_usd_cents(value: f64) -> String {
    format_money(value, 2)
}

pub fn format_percent(value: f64) -> String {
    format!("{:.1}%", value * 100.0)
}

fn format_money(value: f64, decimals: usize) -> String {
    let magnitude = format!("{:.*}", decimals, value.abs());
    let negative = value < 0.0 && magnitude.chars().any(|ch| ch != '0' && ch != '.');
    let (int_part, frac_part) = match magnitude.split_once('.') {
        Some((int_part, frac)) => (int_part, Some(frac)),
        None => (magnitude.as_str(), None),
    };

    let digit_count = int_part.len();
    let mut grouped = String::with_capacity(digit_count + digit_count / 3 + 4);
    grouped.push('$');
    if negative {
        grouped.push('-');
    }
    for (idx, ch) in int_part.chars().enumerate() {
        if idx > 0 && (digit_count - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if let Some(frac) = frac_part {
        grouped.push('.');
        grouped.push_str(frac);
    }
    grouped
}
