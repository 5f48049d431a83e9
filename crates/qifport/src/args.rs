//! Command-line argument groups shared by the qifport binaries.

use chrono::NaiveDate;
use clap::Args;
use qifport_core::{DateRange, DateRangeError};
use qifport_export::MappingFiles;
use std::path::PathBuf;

/// Clean a path pasted from a shell or file manager.
///
/// Trims whitespace, drops a leading PowerShell `& ` call operator, and strips
/// surrounding quotes.
pub fn clean_path(raw: &str) -> Result<PathBuf, String> {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_prefix("& ").unwrap_or(trimmed);
    let trimmed = trimmed.trim_matches(|c| c == '"' || c == '\'');
    if trimmed.is_empty() {
        return Err("path cannot be empty".to_string());
    }
    Ok(PathBuf::from(trimmed))
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| format!("invalid date '{raw}': use YYYY-MM-DD"))
}

/// A comma separated list of exact account names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountList(pub Vec<String>);

/// Parse a comma separated account list. Blank entries are rejected.
pub fn parse_account_list(raw: &str) -> Result<AccountList, String> {
    raw.split(',')
        .map(|name| {
            let name = name.trim();
            if name.is_empty() {
                Err(format!("invalid account list '{raw}': account names cannot be empty"))
            } else {
                Ok(name.to_string())
            }
        })
        .collect::<Result<Vec<_>, _>>()
        .map(AccountList)
}

/// Input file and account selection.
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// The QIF file to read
    #[arg(short = 'i', long = "input-file", value_name = "FILE", value_parser = clean_path)]
    pub input_file: PathBuf,

    /// Comma separated list of account names (exact, case-sensitive)
    #[arg(short = 'A', long, value_name = "NAMES", value_parser = parse_account_list)]
    pub accounts: Option<AccountList>,
}

impl InputArgs {
    /// The selected account names; empty means all.
    pub fn account_names(&self) -> &[String] {
        match &self.accounts {
            Some(list) => &list.0,
            None => &[],
        }
    }
}

/// Inclusive date bounds.
#[derive(Args, Debug, Clone, Default)]
pub struct RangeArgs {
    /// Only include transactions on or after this date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE", value_parser = parse_date)]
    pub start_date: Option<NaiveDate>,

    /// Only include transactions on or before this date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE", value_parser = parse_date)]
    pub end_date: Option<NaiveDate>,
}

impl RangeArgs {
    /// Build the date range, rejecting an end before the start.
    pub fn date_range(&self) -> Result<DateRange, DateRangeError> {
        DateRange::new(self.start_date, self.end_date)
    }
}

/// Optional mapping files.
#[derive(Args, Debug, Clone, Default)]
pub struct MappingArgs {
    /// Category mapping file (source,target rows)
    #[arg(short = 'c', long, value_name = "FILE", value_parser = clean_path)]
    pub category_map_file: Option<PathBuf>,

    /// Payee mapping file (source,target rows)
    #[arg(short = 'p', long, value_name = "FILE", value_parser = clean_path)]
    pub payee_map_file: Option<PathBuf>,

    /// Account mapping file (source,target rows)
    #[arg(short = 'a', long, value_name = "FILE", value_parser = clean_path)]
    pub account_map_file: Option<PathBuf>,

    /// Tag mapping file (source,target rows)
    #[arg(short = 't', long, value_name = "FILE", value_parser = clean_path)]
    pub tag_map_file: Option<PathBuf>,
}

impl MappingArgs {
    /// The configured mapping file paths.
    pub fn files(&self) -> MappingFiles {
        MappingFiles {
            account: self.account_map_file.clone(),
            category: self.category_map_file.clone(),
            payee: self.payee_map_file.clone(),
            tag: self.tag_map_file.clone(),
        }
    }
}
