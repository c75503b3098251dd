use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Explore retail order profitability from the command line",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Render KPIs, grouped profit and the state pivot for a selection
    Report(ReportArgs),
    /// List the filterable values and discount bounds a dataset offers
    Domains(DomainsArgs),
    /// Preview cleaned order rows
    Preview(PreviewArgs),
    /// Show the type each source column coerced to
    Columns(ColumnsArgs),
}

/// Flags shared by every subcommand that reads a dataset.
#[derive(Debug, Args)]
pub struct DatasetArgs {
    /// Dataset file to load; skips searching entirely
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,
    /// Directory to search recursively when no input is given (defaults to
    /// the home directory)
    #[arg(long = "search-root")]
    pub search_root: Option<PathBuf>,
    /// File name to search for (defaults to superstore.csv)
    #[arg(long = "dataset-file")]
    pub dataset_file: Option<String>,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to windows-1252)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// YAML file supplying defaults for these flags
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Selection flags. Omitted axes keep their full domain.
#[derive(Debug, Args)]
pub struct FilterArgs {
    /// Regions to keep (repeatable or comma-separated)
    #[arg(long = "regions", value_delimiter = ',', action = clap::ArgAction::Append)]
    pub regions: Vec<String>,
    /// Categories to keep (repeatable or comma-separated)
    #[arg(long = "categories", value_delimiter = ',', action = clap::ArgAction::Append)]
    pub categories: Vec<String>,
    /// Sub-categories to keep (repeatable or comma-separated)
    #[arg(long = "sub-categories", value_delimiter = ',', action = clap::ArgAction::Append)]
    pub sub_categories: Vec<String>,
    /// Lowest discount to keep, inclusive (defaults to the dataset minimum)
    #[arg(long = "discount-min")]
    pub discount_min: Option<f64>,
    /// Highest discount to keep, inclusive (defaults to the dataset maximum)
    #[arg(long = "discount-max")]
    pub discount_max: Option<f64>,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
#[value(rename_all = "kebab-case")]
pub enum OutputFormat {
    Table,
    Json,
}

impl Default for OutputFormat {
    fn default() -> Self {
        OutputFormat::Table
    }
}

#[derive(Debug, Args)]
pub struct ReportArgs {
    #[command(flatten)]
    pub dataset: DatasetArgs,
    #[command(flatten)]
    pub filters: FilterArgs,
    /// Maximum states shown in the state-by-region pivot (defaults to 25)
    #[arg(long = "pivot-states")]
    pub pivot_states: Option<usize>,
    /// Output format
    #[arg(long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

#[derive(Debug, Args)]
pub struct DomainsArgs {
    #[command(flatten)]
    pub dataset: DatasetArgs,
    /// Output format
    #[arg(long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

#[derive(Debug, Args)]
pub struct PreviewArgs {
    #[command(flatten)]
    pub dataset: DatasetArgs,
    /// Number of rows to display
    #[arg(long, default_value_t = 10)]
    pub rows: usize,
    /// Output format
    #[arg(long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

#[derive(Debug, Args)]
pub struct ColumnsArgs {
    #[command(flatten)]
    pub dataset: DatasetArgs,
    /// Output format
    #[arg(long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}
