//! Column coercion report.
//!
//! Renders the kind each source column resolved to, how many cells survived
//! that interpretation, and a sample value. Useful when a column unexpectedly
//! stayed text and the numbers downstream look flat.

use anyhow::Result;
use log::info;

use crate::{
    cli::{ColumnsArgs, OutputFormat},
    config::RunSettings,
    table::{self, Align},
};

pub fn execute(args: &ColumnsArgs) -> Result<()> {
    let settings = RunSettings::resolve(&args.dataset, None)?;
    let dataset = settings.load()?;

    if dataset.columns.is_empty() {
        info!("Dataset {:?} has no columns", dataset.path);
        return Ok(());
    }

    match args.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&dataset.columns)?);
        }
        OutputFormat::Table => {
            let rows: Vec<Vec<String>> = dataset
                .columns
                .iter()
                .enumerate()
                .map(|(idx, column)| {
                    vec![
                        (idx + 1).to_string(),
                        column.name.clone(),
                        column.kind.to_string(),
                        column.non_null.to_string(),
                        column.sample.clone().unwrap_or_default(),
                    ]
                })
                .collect();
            let headers = vec![
                "#".to_string(),
                "name".to_string(),
                "type".to_string(),
                "non-null".to_string(),
                "sample".to_string(),
            ];
            table::print_aligned(
                &headers,
                &rows,
                &[
                    Align::Right,
                    Align::Left,
                    Align::Left,
                    Align::Right,
                    Align::Left,
                ],
            );
        }
    }

    info!(
        "Listed {} column(s) from {:?}",
        dataset.columns.len(),
        dataset.path
    );
    Ok(())
}
