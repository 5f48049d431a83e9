//! Export pipelines for qifport
//!
//! This crate drives the end-to-end conversion of a QIF file:
//!
//! - [`export_transactions`] - Writes every selected account as CSV, JSON, or XML
//! - [`balance_history`] - Reconstructs the daily balance series of one account
//! - [`account_stats`] - Lists accounts with counts and date bounds
//! - [`MappingFiles`] - Loads the account, category, payee, and tag rename tables
//!
//! Output is split into numbered files of at most
//! [`records_per_file`](ExportConfig::records_per_file) records each, and every
//! file carries its own header or document framing.
//!
//! # Example
//!
//! ```rust,no_run
//! use qifport_core::NoopObserver;
//! use qifport_export::{export_transactions, ExportConfig, MappingFiles, OutputFormat};
//!
//! let config = ExportConfig::builder("export.qif")
//!     .output_dir("out")
//!     .format(OutputFormat::Json)
//!     .records_per_file(1000)
//!     .build();
//!
//! let mappings = MappingFiles::default().load()?;
//! let summary = export_transactions(&config, &mappings, &NoopObserver)?;
//! println!("{} records in {} files", summary.total_records(), summary.total_files());
//! # Ok::<(), qifport_export::ExportError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod batch;
pub mod config;
pub mod error;
pub mod format;
pub mod mapping_file;
pub mod pipeline;
pub mod source;
pub mod stats;

pub use batch::Batcher;
pub use config::{
    BalanceConfig, BalanceConfigBuilder, ExportConfig, ExportConfigBuilder, OutputFormat,
    DEFAULT_RECORDS_PER_FILE,
};
pub use error::ExportError;
pub use format::{BalanceCsvFormat, CsvFormat, FileFormat, JsonFormat, RecordWriter, XmlFormat};
pub use mapping_file::{load_mapping_file, read_mapping, MappingFiles};
pub use pipeline::{
    balance_history, export_transactions, AccountExport, BalanceSummary, ExportSummary,
};
pub use source::read_source;
pub use stats::{account_stats, account_stats_file, AccountStats};
