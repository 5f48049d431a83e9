//! End-of-run validation report.

use crate::Issue;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

const SHOWN_DUPLICATES: usize = 5;
const SHOWN_UNUSED: usize = 3;
const RULE: &str = "=============================";

/// Error writing the validation log.
#[derive(Debug, Error)]
pub enum LogError {
    /// The report could not be serialized.
    #[error("failed to serialize validation report: {0}")]
    Serialize(#[from] serde_json::Error),
    /// The log file could not be written.
    #[error("failed to write validation log {}: {source}", .path.display())]
    Io {
        /// Log file path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

/// Records sharing date, payee, and amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateGroup {
    /// Shared date.
    pub date: NaiveDate,
    /// Shared payee.
    pub merchant: String,
    /// Shared amount.
    pub amount: Decimal,
    /// How many records share these values.
    pub count: usize,
}

/// A consistent snapshot of everything tracked during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// Records written to output.
    pub total_transactions: usize,
    /// Records dropped by the date range.
    pub filtered_transactions: usize,
    /// Records dropped because they failed to normalize.
    pub rejected_transactions: usize,
    /// Admitted records with an empty payee.
    pub missing_payees: usize,
    /// Admitted records with an empty category.
    pub missing_categories: usize,
    /// Admitted records with a zero amount.
    pub zero_amounts: usize,
    /// Rejections per reason code.
    pub rejections: BTreeMap<String, usize>,
    /// Duplicate candidate groups, in date order.
    pub duplicates: Vec<DuplicateGroup>,
    /// Per mapping kind, table entries that never matched.
    pub unused_mappings: BTreeMap<String, Vec<String>>,
    /// `kind:value` lookups with no table entry, with occurrence counts.
    pub unmatched: BTreeMap<String, usize>,
    /// Individually recorded issues.
    pub issues: Vec<Issue>,
}

impl ValidationReport {
    /// Whether the summary has anything to report.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        self.missing_payees > 0
            || self.missing_categories > 0
            || self.zero_amounts > 0
            || self.rejected_transactions > 0
            || !self.duplicates.is_empty()
            || !self.unused_mappings.is_empty()
            || !self.unmatched.is_empty()
    }

    /// Write the human-readable summary.
    ///
    /// Long lists are truncated; the JSON log carries the full detail.
    pub fn write_summary<W: Write>(&self, out: &mut W) -> io::Result<()> {
        if !self.has_warnings() {
            return writeln!(out, "Data validation: no issues found");
        }

        writeln!(out, "Data Validation Summary:")?;
        writeln!(out, "{RULE}")?;

        if self.missing_payees > 0 {
            writeln!(out, "  - Missing payees: {} transactions", self.missing_payees)?;
        }
        if self.missing_categories > 0 {
            writeln!(
                out,
                "  - Missing categories: {} transactions",
                self.missing_categories
            )?;
        }
        if self.zero_amounts > 0 {
            writeln!(out, "  - Zero amounts: {} transactions", self.zero_amounts)?;
        }
        if self.rejected_transactions > 0 {
            let reasons: Vec<String> = self
                .rejections
                .iter()
                .map(|(code, count)| format!("{code}: {count}"))
                .collect();
            writeln!(
                out,
                "  - Rejected transactions: {} ({})",
                self.rejected_transactions,
                reasons.join(", ")
            )?;
        }

        if !self.duplicates.is_empty() {
            writeln!(
                out,
                "  - Potential duplicates: {} groups detected",
                self.duplicates.len()
            )?;
            for dup in self.duplicates.iter().take(SHOWN_DUPLICATES) {
                writeln!(
                    out,
                    "    - {} | {} | {} ({} times)",
                    dup.date, dup.merchant, dup.amount, dup.count
                )?;
            }
            if self.duplicates.len() > SHOWN_DUPLICATES {
                writeln!(
                    out,
                    "    ... and {} more",
                    self.duplicates.len() - SHOWN_DUPLICATES
                )?;
            }
        }

        for (kind, values) in &self.unused_mappings {
            writeln!(out, "  - {kind} mapping: {} rules never used", values.len())?;
            for value in values.iter().take(SHOWN_UNUSED) {
                writeln!(out, "    - \"{value}\"")?;
            }
            if values.len() > SHOWN_UNUSED {
                writeln!(out, "    ... and {} more", values.len() - SHOWN_UNUSED)?;
            }
        }

        if !self.unmatched.is_empty() {
            writeln!(
                out,
                "  - Unmapped values: {} different values not in mapping files",
                self.unmatched.len()
            )?;
        }

        writeln!(out, "{RULE}")
    }

    /// Render the report as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write the report as pretty-printed JSON to `path`, replacing any
    /// existing file.
    pub fn write_log(&self, path: &Path) -> Result<(), LogError> {
        let json = self.to_json()?;
        fs::write(path, json + "\n").map_err(|source| LogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "wrote validation log");
        Ok(())
    }
}
