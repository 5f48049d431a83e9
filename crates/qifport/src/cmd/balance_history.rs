//! qifport-balance-history - Reconstruct the daily balance of one account.
//!
//! One known balance anchors the series: either the balance before the first
//! transaction (`--opening-balance`) or the balance after the last one
//! (`--current-balance`).
//!
//! # Usage
//!
//! ```bash
//! qifport-balance-history -i export.qif -A Checking --current-balance 2500.00
//! qifport-balance-history -i export.qif -A Checking --opening-balance 0 -o out -r 1000
//! ```

use crate::args::{clean_path, InputArgs, RangeArgs};
use crate::{logging, report};
use anyhow::{Context, Result};
use clap::Parser;
use qifport_core::{BalanceAnchor, Mappings};
use qifport_export::{balance_history, BalanceConfig, DEFAULT_RECORDS_PER_FILE};
use qifport_validate::ValidationTracker;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

/// File name of the structured validation log.
pub const VALIDATION_LOG: &str = "balance_history_validation.log";

/// Generate a daily balance history for one account.
#[derive(Parser, Debug)]
#[command(name = "qifport-balance-history")]
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

    #[command(flatten)]
    range: RangeArgs,

    /// Maximum records per output file; 0 writes a single file
    #[arg(short = 'r', long, value_name = "N", default_value_t = DEFAULT_RECORDS_PER_FILE)]
    records_per_file: usize,

    /// Balance before the first transaction
    #[arg(long, value_name = "AMOUNT", allow_hyphen_values = true)]
    opening_balance: Option<String>,

    /// Balance after the last transaction
    #[arg(long, value_name = "AMOUNT", allow_hyphen_values = true)]
    current_balance: Option<String>,

    /// Show debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn config(&self) -> Result<BalanceConfig, String> {
        let account = match self.input.account_names() {
            [account] => account.clone(),
            [] => return Err("balance history requires exactly one account (--accounts)".into()),
            many => {
                return Err(format!(
                    "balance history requires exactly one account, got {}",
                    many.len()
                ))
            }
        };

        let anchor = BalanceAnchor::from_options(
            self.opening_balance.as_deref(),
            self.current_balance.as_deref(),
        )
        .map_err(|e| e.to_string())?;
        let range = self.range.date_range().map_err(|e| e.to_string())?;

        Ok(
            BalanceConfig::builder(&self.input.input_file, account, anchor)
                .output_dir(&self.output_path)
                .date_range(range)
                .records_per_file(self.records_per_file)
                .build(),
        )
    }
}

/// Main entry point for the balance history command.
pub fn main() -> ExitCode {
    let args = Args::parse();
    logging::init(args.verbose);

    let config = match args.config() {
        Ok(config) => config,
        Err(e) => return report::usage_error(e),
    };

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => report::fail(&e),
    }
}

/// Generate the balance history for a validated configuration.
pub fn run(config: &BalanceConfig) -> Result<()> {
    let mappings = Mappings::default();
    let tracker = ValidationTracker::new();
    let summary = balance_history(config, &mappings, &tracker)
        .context("failed to generate balance history")?;
    let validation = tracker.report(&mappings);

    let log_path = config.output_dir.join(VALIDATION_LOG);
    if let Err(e) = validation.write_log(&log_path) {
        tracing::warn!(error = %e, "could not write validation log");
    }

    let mut stdout = io::stdout().lock();
    report::write_balance_summary(&mut stdout, config, &summary)?;
    validation.write_summary(&mut stdout)?;
    stdout.flush()?;
    Ok(())
}
