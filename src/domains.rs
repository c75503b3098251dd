//! Filter-control surface: the values a dataset offers for selection.
//!
//! Interactive frontends build their region, category and sub-category
//! pickers and the discount slider from this output.

use anyhow::Result;
use log::info;

use crate::{
    cli::{DomainsArgs, OutputFormat},
    config::RunSettings,
    filter::FilterDomains,
    table::{self, Align},
};

pub fn execute(args: &DomainsArgs) -> Result<()> {
    let settings = RunSettings::resolve(&args.dataset, None)?;
    let dataset = settings.load()?;
    let domains = FilterDomains::scan(&dataset.orders);

    match args.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&domains)?);
        }
        OutputFormat::Table => {
            let mut rows = Vec::new();
            for (value, count) in &domains.regions {
                rows.push(vec!["Region".to_string(), value.clone(), count.to_string()]);
            }
            for (value, count) in &domains.categories {
                rows.push(vec![
                    "Category".to_string(),
                    value.clone(),
                    count.to_string(),
                ]);
            }
            for (value, count) in &domains.sub_categories {
                rows.push(vec![
                    "Sub-Category".to_string(),
                    value.clone(),
                    count.to_string(),
                ]);
            }
            let headers = vec![
                "Filter".to_string(),
                "Value".to_string(),
                "Orders".to_string(),
            ];
            table::print_aligned(&headers, &rows, &[Align::Left, Align::Left, Align::Right]);
            println!();
            println!(
                "Discount range: {:.2} to {:.2}",
                domains.discount_min, domains.discount_max
            );
        }
    }

    info!(
        "Scanned filter domains from {} order(s) in {:?}",
        dataset.row_count(),
        dataset.path
    );
    Ok(())
}
