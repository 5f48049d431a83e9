//! qifport-account-stats - List the Bank and credit card accounts of a QIF file.
//!
//! # Usage
//!
//! ```bash
//! qifport-account-stats -i export.qif
//! qifport-account-stats -i export.qif -A "Checking,Visa Card"
//! ```

use crate::args::InputArgs;
use crate::{logging, report};
use anyhow::{Context, Result};
use clap::Parser;
use qifport_export::account_stats_file;
use std::io::{self, Write};
use std::process::ExitCode;

/// Show transaction counts and date ranges per account.
#[derive(Parser, Debug)]
#[command(name = "qifport-account-stats")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(flatten)]
    input: InputArgs,

    /// Show debug logging
    #[arg(short, long)]
    verbose: bool,
}

/// Main entry point for the account statistics command.
pub fn main() -> ExitCode {
    let args = Args::parse();
    logging::init(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => report::fail(&e),
    }
}

fn run(args: &Args) -> Result<()> {
    let path = &args.input.input_file;
    let stats = account_stats_file(path, args.input.account_names())
        .with_context(|| format!("failed to analyze {}", path.display()))?;

    let mut stdout = io::stdout().lock();
    report::write_account_stats(&mut stdout, path, &stats)?;
    stdout.flush()?;
    Ok(())
}
