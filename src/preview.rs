use anyhow::Result;
use log::info;

use crate::{
    cli::{OutputFormat, PreviewArgs},
    config::RunSettings,
    dataset::Order,
    table::{self, Align},
};

/// Shows the first rows of the dataset after cleaning, so what is on screen
/// is exactly what filtering and aggregation will see.
pub fn execute(args: &PreviewArgs) -> Result<()> {
    let settings = RunSettings::resolve(&args.dataset, None)?;
    let dataset = settings.load()?;
    let shown: Vec<&Order> = dataset.orders.iter().take(args.rows).collect();

    match args.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&shown)?);
        }
        OutputFormat::Table => {
            let headers: Vec<String> = [
                "Order Date",
                "Region",
                "State",
                "City",
                "Category",
                "Sub-Category",
                "Segment",
                "Customer ID",
                "Sales",
                "Profit",
                "Discount",
                "Quantity",
            ]
            .iter()
            .map(|h| h.to_string())
            .collect();
            let rows: Vec<Vec<String>> = shown
                .iter()
                .map(|order| {
                    vec![
                        order
                            .order_date
                            .map(|date| date.format("%Y-%m-%d").to_string())
                            .unwrap_or_default(),
                        order.region.clone(),
                        order.state.clone(),
                        order.city.clone(),
                        order.category.clone(),
                        order.sub_category.clone(),
                        order.segment.clone(),
                        order.customer_id.clone(),
                        format!("{:.2}", order.sales),
                        format!("{:.2}", order.profit),
                        format!("{:.2}", order.discount),
                        order.quantity.to_string(),
                    ]
                })
                .collect();
            let mut aligns = vec![Align::Left; 8];
            aligns.extend(std::iter::repeat_n(Align::Right, 4));
            table::print_aligned(&headers, &rows, &aligns);
        }
    }

    info!(
        "Displayed {} of {} cleaned row(s) from {:?}",
        shown.len(),
        dataset.row_count(),
        dataset.path
    );
    Ok(())
}
