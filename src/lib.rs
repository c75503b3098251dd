pub mod aggregate;
pub mod cli;
pub mod coerce;
pub mod columns;
pub mod config;
pub mod data;
pub mod dataset;
pub mod domains;
pub mod error;
pub mod filter;
pub mod io_utils;
pub mod locate;
pub mod preview;
pub mod report;
pub mod store;
pub mod table;

use std::{env, sync::OnceLock};

use anyhow::Result;
use clap::Parser;
use log::LevelFilter;

use crate::cli::{Cli, Commands};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("profitlens", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Report(args) => report::execute(&args),
        Commands::Domains(args) => domains::execute(&args),
        Commands::Preview(args) => preview::execute(&args),
        Commands::Columns(args) => columns::execute(&args),
    }
}
