//! Per-account extraction pipelines.
//!
//! Both entry points walk the located account blocks once. Each transaction is
//! normalized, mapped, and tested against the date range; admitted records go
//! to the output batcher (transaction export) or into daily deltas (balance
//! history). Per-record outcomes are reported to the [`Observer`].

use crate::batch::Batcher;
use crate::config::{BalanceConfig, ExportConfig, OutputFormat};
use crate::error::ExportError;
use crate::format::{BalanceCsvFormat, CsvFormat, FileFormat, JsonFormat, XmlFormat};
use crate::source::read_source;
use qifport_core::{
    normalize, reconstruct, AccountKind, BalanceRecord, DailyDeltas, DateRange, MappingKind,
    Mappings, Observer, TransactionRecord,
};
use qifport_parser::{AccountBlock, QifParser};
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};

/// Outcome of exporting one account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountExport {
    /// Account name as it appears in the input.
    pub name: String,
    /// Account name written into records, after mapping.
    pub output_name: String,
    /// Account kind.
    pub kind: AccountKind,
    /// Records written.
    pub records: usize,
    /// Records dropped by the date range.
    pub filtered: usize,
    /// Records dropped because they failed to normalize.
    pub rejected: usize,
    /// Files written, in order.
    pub files: Vec<PathBuf>,
}

/// Outcome of a transaction export.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportSummary {
    /// Exported accounts, in file order.
    pub accounts: Vec<AccountExport>,
    /// Requested accounts that the input does not contain.
    pub missing: Vec<String>,
}

impl ExportSummary {
    /// Records written across all accounts.
    pub fn total_records(&self) -> usize {
        self.accounts.iter().map(|a| a.records).sum()
    }

    /// Files written across all accounts.
    pub fn total_files(&self) -> usize {
        self.accounts.iter().map(|a| a.files.len()).sum()
    }
}

/// Outcome of a balance history run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceSummary {
    /// Account name as it appears in the input.
    pub account: String,
    /// Days in the emitted series.
    pub days: usize,
    /// The last balance of the series, if any.
    pub final_balance: Option<Decimal>,
    /// Files written, in order. Empty when the series is empty.
    pub files: Vec<PathBuf>,
}

#[derive(Debug, Default, Clone, Copy)]
struct BlockCounts {
    admitted: usize,
    filtered: usize,
    rejected: usize,
}

/// Settings shared by every block of one run.
struct Extraction<'a> {
    parser: &'a QifParser,
    mappings: &'a Mappings,
    range: DateRange,
    import_tag: bool,
    observer: &'a dyn Observer,
}

impl Extraction<'_> {
    fn run<F>(
        &self,
        source: &str,
        block: &AccountBlock<'_>,
        account: &str,
        mut admit: F,
    ) -> Result<BlockCounts, ExportError>
    where
        F: FnMut(TransactionRecord) -> Result<(), ExportError>,
    {
        let mut counts = BlockCounts::default();

        for raw in self.parser.transactions(source, block) {
            let normalized = match normalize(&raw.value) {
                Ok(normalized) => normalized,
                Err(reason) => {
                    tracing::trace!(account, span = %raw.span, %reason, "rejected transaction");
                    self.observer.transaction_rejected(account, &reason);
                    counts.rejected += 1;
                    continue;
                }
            };

            let record = normalized
                .map(self.mappings, self.observer)
                .into_record(account, self.import_tag);

            if self.range.contains(record.date) {
                self.observer.transaction_admitted(&record);
                counts.admitted += 1;
                admit(record)?;
            } else {
                self.observer.transaction_filtered(&record);
                counts.filtered += 1;
            }
        }

        Ok(counts)
    }
}

fn create_output_dir(dir: &Path) -> Result<(), ExportError> {
    std::fs::create_dir_all(dir).map_err(|source| ExportError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })
}

fn transaction_format(config: &ExportConfig) -> Box<dyn FileFormat<TransactionRecord>> {
    match config.format {
        OutputFormat::Csv | OutputFormat::Monarch => {
            Box::new(CsvFormat::new(config.effective_columns()))
        }
        OutputFormat::Json => Box::new(JsonFormat),
        OutputFormat::Xml => Box::new(XmlFormat),
    }
}

/// Export every selected Bank and credit card account of `config.input`.
///
/// Each account is written to its own numbered files, named after the account
/// as it appears in the input; the mapped name only appears inside records.
pub fn export_transactions(
    config: &ExportConfig,
    mappings: &Mappings,
    observer: &dyn Observer,
) -> Result<ExportSummary, ExportError> {
    let source = read_source(&config.input)?;
    let parser = QifParser::new()?;
    create_output_dir(&config.output_dir)?;

    let format = transaction_format(config);
    let extraction = Extraction {
        parser: &parser,
        mappings,
        range: config.date_range,
        import_tag: config.import_tag,
        observer,
    };

    let mut summary = ExportSummary::default();
    for block in parser.blocks(&source) {
        tracing::debug!(
            account = block.name,
            kind = %block.kind,
            span = %block.body,
            "located account block"
        );
        if !config.selects(block.name) {
            tracing::debug!(account = block.name, "skipping unselected account");
            continue;
        }

        let output_name = mappings.apply(MappingKind::Account, block.name, observer);
        let mut batcher = Batcher::new(
            format.as_ref(),
            &config.output_dir,
            block.name,
            config.records_per_file,
        );
        let counts = extraction.run(&source, &block, &output_name, |record| {
            batcher.push(&record)
        })?;
        let files = batcher.finish()?;

        tracing::info!(
            account = block.name,
            kind = %block.kind,
            records = counts.admitted,
            filtered = counts.filtered,
            rejected = counts.rejected,
            files = files.len(),
            "exported account"
        );
        summary.accounts.push(AccountExport {
            name: block.name.to_string(),
            output_name,
            kind: block.kind,
            records: counts.admitted,
            filtered: counts.filtered,
            rejected: counts.rejected,
            files,
        });
    }

    for requested in &config.accounts {
        if !summary.accounts.iter().any(|a| &a.name == requested) {
            tracing::warn!(account = %requested, "requested account not found in input");
            summary.missing.push(requested.clone());
        }
    }

    Ok(summary)
}

/// Reconstruct and write the daily balance series of one account.
///
/// Fails with [`ExportError::UnknownAccount`] when the input has no Bank or
/// credit card account of that name. A series with no days writes no files.
pub fn balance_history(
    config: &BalanceConfig,
    mappings: &Mappings,
    observer: &dyn Observer,
) -> Result<BalanceSummary, ExportError> {
    let source = read_source(&config.input)?;
    let parser = QifParser::new()?;

    let extraction = Extraction {
        parser: &parser,
        mappings,
        range: config.date_range,
        import_tag: false,
        observer,
    };

    let mut deltas = DailyDeltas::new();
    let mut found = false;
    for block in parser.blocks(&source) {
        if block.name != config.account {
            continue;
        }
        found = true;

        let output_name = mappings.apply(MappingKind::Account, block.name, observer);
        let counts = extraction.run(&source, &block, &output_name, |record| {
            deltas
                .add(record.date, record.amount)
                .map_err(|source| ExportError::Balance {
                    account: config.account.clone(),
                    source,
                })
        })?;
        tracing::debug!(
            account = block.name,
            admitted = counts.admitted,
            filtered = counts.filtered,
            rejected = counts.rejected,
            "accumulated daily deltas"
        );
    }

    if !found {
        return Err(ExportError::UnknownAccount {
            account: config.account.clone(),
        });
    }

    create_output_dir(&config.output_dir)?;
    let series =
        reconstruct(&deltas, config.anchor).map_err(|source| ExportError::Balance {
            account: config.account.clone(),
            source,
        })?;
    let final_balance = series.last().map(|r| r.balance);
    if series.is_empty() {
        tracing::warn!(
            account = %config.account,
            "no transactions in range; no balance history written"
        );
        return Ok(BalanceSummary {
            account: config.account.clone(),
            days: 0,
            final_balance,
            files: Vec::new(),
        });
    }

    let mut batcher = Batcher::<BalanceRecord>::new(
        &BalanceCsvFormat,
        &config.output_dir,
        format!("{}_balance_history", config.account),
        config.records_per_file,
    );
    for record in &series {
        batcher.push(record)?;
    }
    let files = batcher.finish()?;

    tracing::info!(
        account = %config.account,
        days = series.len(),
        files = files.len(),
        "wrote balance history"
    );
    Ok(BalanceSummary {
        account: config.account.clone(),
        days: series.len(),
        final_balance,
        files,
    })
}
