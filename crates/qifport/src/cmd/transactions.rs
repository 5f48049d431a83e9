//! qifport-transactions - Export QIF transactions as CSV, JSON, or XML.
//!
//! # Usage
//!
//! ```bash
//! qifport-transactions -i export.qif -o out
//! qifport-transactions -i export.qif -o out -f json -A "Checking,Visa Card"
//! qifport-transactions -i export.qif -o out --start-date 2023-01-01 -c categories.csv
//! ```

use crate::args::{clean_path, InputArgs, MappingArgs, RangeArgs};
use crate::{logging, report};
use anyhow::{Context, Result};
use clap::Parser;
use qifport_core::{Column, DEFAULT_COLUMNS};
use qifport_export::{export_transactions, ExportConfig, OutputFormat, DEFAULT_RECORDS_PER_FILE};
use qifport_validate::ValidationTracker;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

/// File name of the structured validation log.
pub const VALIDATION_LOG: &str = "transactions_validation.log";

/// Export QIF transactions for budgeting tools.
#[derive(Parser, Debug)]
#[command(name = "qifport-transactions")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(flatten)]
    input: InputArgs,

    /// Directory receiving the output files
    #[arg(
        short = 'o',
        long = "output-path",
        value_name = "DIR",
        default_value = ".",
        value_parser = clean_path
    )]
    output_path: PathBuf,

    /// Output format: CSV, JSON, XML, or MONARCH
    #[arg(short = 'f', long, value_name = "FORMAT", default_value = "CSV")]
    output_format: OutputFormat,

    /// Comma separated CSV columns (CSV format only)
    #[arg(long, value_name = "COLUMNS", default_value = DEFAULT_COLUMNS)]
    csv_columns: String,

    #[command(flatten)]
    range: RangeArgs,

    #[command(flatten)]
    mappings: MappingArgs,

    /// Maximum records per output file; 0 writes a single file per account
    #[arg(short = 'r', long, value_name = "N", default_value_t = DEFAULT_RECORDS_PER_FILE)]
    records_per_file: usize,

    /// Do not add the QIFIMPORT tag to exported records
    #[arg(long)]
    no_import_tag: bool,

    /// Show debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn config(&self) -> Result<ExportConfig, qifport_core::DateRangeError> {
        Ok(ExportConfig::builder(&self.input.input_file)
            .output_dir(&self.output_path)
            .format(self.output_format)
            .columns(Column::parse_list(&self.csv_columns))
            .accounts(self.input.account_names().iter().cloned())
            .date_range(self.range.date_range()?)
            .records_per_file(self.records_per_file)
            .import_tag(!self.no_import_tag)
            .build())
    }
}

/// Main entry point for the transactions command.
pub fn main() -> ExitCode {
    let args = Args::parse();
    logging::init(args.verbose);

    let config = match args.config() {
        Ok(config) => config,
        Err(e) => return report::usage_error(e),
    };

    match run(&args, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => report::fail(&e),
    }
}

/// Run an export with a validated configuration.
pub fn run(args: &Args, config: &ExportConfig) -> Result<()> {
    let mappings = args
        .mappings
        .files()
        .load()
        .context("failed to load mapping files")?;

    let tracker = ValidationTracker::new();
    let summary = export_transactions(config, &mappings, &tracker)
        .context("failed to export transactions")?;
    let validation = tracker.report(&mappings);

    let log_path = config.output_dir.join(VALIDATION_LOG);
    if let Err(e) = validation.write_log(&log_path) {
        tracing::warn!(error = %e, "could not write validation log");
    }

    let mut stdout = io::stdout().lock();
    report::write_export_summary(&mut stdout, config, &summary)?;
    validation.write_summary(&mut stdout)?;
    stdout.flush()?;
    Ok(())
}
