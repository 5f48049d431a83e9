//! User-facing run summaries and fatal error reporting.

use qifport_core::{BalanceAnchor, DateRange};
use qifport_export::{
    AccountStats, BalanceConfig, BalanceSummary, ExportConfig, ExportError, ExportSummary,
};
use std::fmt::Display;
use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;

/// Exit code for failures during a run.
pub const EXIT_RUNTIME: u8 = 1;

/// Exit code for invalid arguments.
pub const EXIT_USAGE: u8 = 2;

/// Describe a date range for a summary, or `None` when unbounded.
pub fn describe_range(range: &DateRange) -> Option<String> {
    if range.is_unbounded() {
        return None;
    }
    let start = range
        .start()
        .map_or_else(|| "earliest".to_string(), |d| d.to_string());
    let end = range
        .end()
        .map_or_else(|| "latest".to_string(), |d| d.to_string());
    Some(format!("{start} to {end}"))
}

/// A remediation hint for common I/O failures.
pub fn hint(err: &anyhow::Error) -> Option<&'static str> {
    let kind = err
        .chain()
        .find_map(|cause| cause.downcast_ref::<ExportError>())
        .and_then(ExportError::io_kind)?;
    match kind {
        io::ErrorKind::NotFound => {
            Some("check that the file exists and the path is spelled correctly")
        }
        io::ErrorKind::PermissionDenied => {
            Some("check that you have permission to access this path")
        }
        _ => None,
    }
}

/// Report a fatal runtime error on stderr.
pub fn fail(err: &anyhow::Error) -> ExitCode {
    eprintln!("error: {err:#}");
    if let Some(hint) = hint(err) {
        eprintln!("hint: {hint}");
    }
    ExitCode::from(EXIT_RUNTIME)
}

/// Report an invalid argument combination on stderr.
pub fn usage_error(message: impl Display) -> ExitCode {
    eprintln!("error: {message}");
    eprintln!("For more information, try '--help'");
    ExitCode::from(EXIT_USAGE)
}

fn plural(count: usize, word: &str) -> String {
    if count == 1 {
        format!("{count} {word}")
    } else {
        format!("{count} {word}s")
    }
}

/// Write the transaction export summary.
pub fn write_export_summary<W: Write>(
    out: &mut W,
    config: &ExportConfig,
    summary: &ExportSummary,
) -> io::Result<()> {
    writeln!(out, "Export Summary:")?;
    writeln!(out, "Input file: {}", config.input.display())?;
    writeln!(out, "Output format: {}", config.format)?;
    if let Some(range) = describe_range(&config.date_range) {
        writeln!(out, "Date range: {range}")?;
    }
    if config.accounts.is_empty() {
        writeln!(out, "Processed all accounts")?;
    } else {
        writeln!(out, "Processed accounts: {}", config.accounts.join(", "))?;
    }

    for account in &summary.accounts {
        let renamed = if account.output_name == account.name {
            String::new()
        } else {
            format!(" (as {})", account.output_name)
        };
        writeln!(
            out,
            "  {}{renamed} [{}]: {}, {}",
            account.name,
            account.kind,
            plural(account.records, "record"),
            plural(account.files.len(), "file")
        )?;
    }
    for missing in &summary.missing {
        writeln!(out, "  {missing}: not found in input file")?;
    }

    writeln!(out, "Output directory: {}", config.output_dir.display())?;
    writeln!(
        out,
        "Files written: {} ({})",
        summary.total_files(),
        plural(summary.total_records(), "record")
    )?;
    if config.records_per_file > 0 {
        writeln!(out, "Split files: {} records per file", config.records_per_file)?;
    }
    writeln!(out)
}

/// Write the balance history summary.
pub fn write_balance_summary<W: Write>(
    out: &mut W,
    config: &BalanceConfig,
    summary: &BalanceSummary,
) -> io::Result<()> {
    writeln!(out, "Balance History Summary:")?;
    writeln!(out, "Input file: {}", config.input.display())?;
    writeln!(out, "Account: {}", summary.account)?;
    match config.anchor {
        BalanceAnchor::Opening(value) => writeln!(out, "Opening balance: {value}")?,
        BalanceAnchor::Current(value) => {
            writeln!(out, "Current balance (as of last transaction): {value}")?;
        }
    }
    if let Some(range) = describe_range(&config.date_range) {
        writeln!(out, "Date range: {range}")?;
    }
    writeln!(out, "Balance records generated: {}", summary.days)?;
    if let Some(balance) = summary.final_balance {
        writeln!(out, "Final balance: {balance}")?;
    }
    writeln!(out, "Output directory: {}", config.output_dir.display())?;
    writeln!(out, "Files written: {}", summary.files.len())?;
    writeln!(out)
}

/// Write per-account statistics.
pub fn write_account_stats<W: Write>(
    out: &mut W,
    input: &Path,
    stats: &[AccountStats],
) -> io::Result<()> {
    if stats.is_empty() {
        return writeln!(out, "No accounts found in the file.");
    }

    writeln!(out, "Account Statistics from {}:", input.display())?;
    writeln!(out)?;
    for account in stats {
        writeln!(out, "Account: {} (Type: {})", account.name, account.kind)?;
        match (account.earliest, account.latest) {
            (Some(earliest), Some(latest)) if account.transactions > 0 => {
                writeln!(out, "  Transactions: {}", account.transactions)?;
                writeln!(out, "  Date Range: {earliest} to {latest}")?;
            }
            _ if account.transactions > 0 => {
                writeln!(out, "  Transactions: {}", account.transactions)?;
                writeln!(out, "  Date Range: unknown")?;
            }
            _ => writeln!(out, "  No transactions found")?,
        }
        writeln!(out)?;
    }
    Ok(())
}
