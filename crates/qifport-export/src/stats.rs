//! Per-account statistics without writing any output.

use crate::config::selects;
use crate::error::ExportError;
use crate::source::read_source;
use chrono::NaiveDate;
use qifport_core::{canonical_date, AccountKind};
use qifport_parser::QifParser;
use std::path::Path;

/// Summary of one account block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountStats {
    /// Account name as it appears in the input.
    pub name: String,
    /// Account kind.
    pub kind: AccountKind,
    /// Matched transaction entries, including ones that would be rejected.
    pub transactions: usize,
    /// Earliest valid transaction date.
    pub earliest: Option<NaiveDate>,
    /// Latest valid transaction date.
    pub latest: Option<NaiveDate>,
}

/// Collect statistics for the selected accounts of `source`.
///
/// An empty `accounts` list selects every account.
pub fn account_stats(source: &str, parser: &QifParser, accounts: &[String]) -> Vec<AccountStats> {
    parser
        .blocks(source)
        .filter(|block| selects(accounts, block.name))
        .map(|block| {
            let mut stats = AccountStats {
                name: block.name.to_string(),
                kind: block.kind,
                transactions: 0,
                earliest: None,
                latest: None,
            };

            for raw in parser.transactions(source, &block) {
                stats.transactions += 1;
                let text = canonical_date(raw.value.month, raw.value.day, raw.value.year);
                if let Ok(date) = NaiveDate::parse_from_str(&text, "%Y-%m-%d") {
                    stats.earliest = Some(stats.earliest.map_or(date, |d| d.min(date)));
                    stats.latest = Some(stats.latest.map_or(date, |d| d.max(date)));
                }
            }
            stats
        })
        .collect()
}

/// Read `path` and collect statistics for the selected accounts.
pub fn account_stats_file(
    path: &Path,
    accounts: &[String],
) -> Result<Vec<AccountStats>, ExportError> {
    let source = read_source(path)?;
    let parser = QifParser::new()?;
    Ok(account_stats(&source, &parser, accounts))
}
