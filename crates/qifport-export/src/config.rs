//! Configuration for export runs.
//!
//! Configurations are immutable once built and passed explicitly to the
//! pipeline entry points.

use qifport_core::{BalanceAnchor, Column, DateRange};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Default maximum number of records per output file.
pub const DEFAULT_RECORDS_PER_FILE: usize = 5000;

/// Transaction output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OutputFormat {
    /// Quoted CSV with a configurable column list.
    #[default]
    Csv,
    /// A pretty-printed JSON array per file.
    Json,
    /// An XML document per file.
    Xml,
    /// CSV with the default column list, whatever columns were requested.
    Monarch,
}

impl OutputFormat {
    /// File extension, without the dot.
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Csv | Self::Monarch => "csv",
            Self::Json => "json",
            Self::Xml => "xml",
        }
    }

    /// The format name as accepted on the command line.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Csv => "CSV",
            Self::Json => "JSON",
            Self::Xml => "XML",
            Self::Monarch => "MONARCH",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CSV" => Ok(Self::Csv),
            "JSON" => Ok(Self::Json),
            "XML" => Ok(Self::Xml),
            "MONARCH" => Ok(Self::Monarch),
            _ => Err(format!(
                "unsupported output format '{s}': expected CSV, JSON, XML, or MONARCH"
            )),
        }
    }
}

/// Configuration for a transaction export.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// The QIF file to read.
    pub input: PathBuf,
    /// Directory receiving the output files.
    pub output_dir: PathBuf,
    /// Output format.
    pub format: OutputFormat,
    /// CSV columns. Ignored by JSON, XML, and Monarch output.
    pub columns: Vec<Column>,
    /// Accounts to export, by source name. Empty selects every account.
    pub accounts: Vec<String>,
    /// Inclusive date window.
    pub date_range: DateRange,
    /// Split threshold; `0` never splits.
    pub records_per_file: usize,
    /// Prepend the import sentinel to every record's tags.
    pub import_tag: bool,
}

impl ExportConfig {
    /// Start building an export configuration for `input`.
    pub fn builder(input: impl Into<PathBuf>) -> ExportConfigBuilder {
        ExportConfigBuilder::new(input)
    }

    /// The columns actually written for CSV output.
    pub fn effective_columns(&self) -> Vec<Column> {
        match self.format {
            OutputFormat::Monarch => Column::defaults(),
            _ => self.columns.clone(),
        }
    }

    /// Whether the account named `name` in the source is selected.
    pub fn selects(&self, name: &str) -> bool {
        selects(&self.accounts, name)
    }
}

pub(crate) fn selects(accounts: &[String], name: &str) -> bool {
    accounts.is_empty() || accounts.iter().any(|a| a == name)
}

/// Builder for [`ExportConfig`].
#[derive(Debug, Clone)]
pub struct ExportConfigBuilder {
    config: ExportConfig,
}

impl ExportConfigBuilder {
    /// Create a builder with default settings.
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            config: ExportConfig {
                input: input.into(),
                output_dir: PathBuf::from("."),
                format: OutputFormat::default(),
                columns: Column::defaults(),
                accounts: Vec::new(),
                date_range: DateRange::unbounded(),
                records_per_file: DEFAULT_RECORDS_PER_FILE,
                import_tag: false,
            },
        }
    }

    /// Set the output directory.
    pub fn output_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.config.output_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Set the output format.
    pub const fn format(mut self, format: OutputFormat) -> Self {
        self.config.format = format;
        self
    }

    /// Set the CSV column list.
    pub fn columns(mut self, columns: Vec<Column>) -> Self {
        self.config.columns = columns;
        self
    }

    /// Restrict the export to these source account names.
    pub fn accounts<I, S>(mut self, accounts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.accounts = accounts.into_iter().map(Into::into).collect();
        self
    }

    /// Set the inclusive date window.
    pub const fn date_range(mut self, range: DateRange) -> Self {
        self.config.date_range = range;
        self
    }

    /// Set the split threshold; `0` never splits.
    pub const fn records_per_file(mut self, count: usize) -> Self {
        self.config.records_per_file = count;
        self
    }

    /// Enable or disable the import sentinel tag.
    pub const fn import_tag(mut self, enabled: bool) -> Self {
        self.config.import_tag = enabled;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> ExportConfig {
        self.config
    }
}

/// Configuration for a balance history run.
#[derive(Debug, Clone)]
pub struct BalanceConfig {
    /// The QIF file to read.
    pub input: PathBuf,
    /// Directory receiving the output files.
    pub output_dir: PathBuf,
    /// The single account to reconstruct, by source name.
    pub account: String,
    /// The known balance seeding the series.
    pub anchor: BalanceAnchor,
    /// Inclusive date window.
    pub date_range: DateRange,
    /// Split threshold; `0` never splits.
    pub records_per_file: usize,
}

impl BalanceConfig {
    /// Start building a balance configuration.
    pub fn builder(
        input: impl Into<PathBuf>,
        account: impl Into<String>,
        anchor: BalanceAnchor,
    ) -> BalanceConfigBuilder {
        BalanceConfigBuilder::new(input, account, anchor)
    }
}

/// Builder for [`BalanceConfig`].
#[derive(Debug, Clone)]
pub struct BalanceConfigBuilder {
    config: BalanceConfig,
}

impl BalanceConfigBuilder {
    /// Create a builder with default settings.
    pub fn new(
        input: impl Into<PathBuf>,
        account: impl Into<String>,
        anchor: BalanceAnchor,
    ) -> Self {
        Self {
            config: BalanceConfig {
                input: input.into(),
                output_dir: PathBuf::from("."),
                account: account.into(),
                anchor,
                date_range: DateRange::unbounded(),
                records_per_file: DEFAULT_RECORDS_PER_FILE,
            },
        }
    }

    /// Set the output directory.
    pub fn output_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.config.output_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Set the inclusive date window.
    pub const fn date_range(mut self, range: DateRange) -> Self {
        self.config.date_range = range;
        self
    }

    /// Set the split threshold; `0` never splits.
    pub const fn records_per_file(mut self, count: usize) -> Self {
        self.config.records_per_file = count;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> BalanceConfig {
        self.config
    }
}
