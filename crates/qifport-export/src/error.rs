//! Export errors.
//!
//! Every variant is fatal for the run. Per-record problems never surface here;
//! they are reported to the [`Observer`](qifport_core::Observer) instead.

use qifport_core::BalanceError;
use qifport_parser::ParseError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Fatal export failure.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The QIF input could not be read.
    #[error("failed to read input file {}: {source}", .path.display())]
    ReadInput {
        /// Input path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The output directory could not be created.
    #[error("failed to create output directory {}: {source}", .path.display())]
    CreateDir {
        /// Directory path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// An output file could not be created.
    #[error("failed to create output file {}: {source}", .path.display())]
    CreateFile {
        /// File path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Writing to an output file failed.
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        /// File path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Records could not be encoded in the output format.
    #[error("failed to encode {}: {message}", .path.display())]
    Encode {
        /// File path.
        path: PathBuf,
        /// Encoder error message.
        message: String,
    },

    /// A mapping file could not be read.
    #[error("failed to read mapping file {}: {source}", .path.display())]
    MappingFile {
        /// Mapping file path.
        path: PathBuf,
        /// Underlying CSV error.
        #[source]
        source: csv::Error,
    },

    /// The requested account is not in the input.
    #[error("account '{account}' not found in input file")]
    UnknownAccount {
        /// The account name that was requested.
        account: String,
    },

    /// The balance series could not be computed.
    #[error("cannot reconstruct balance history for '{account}': {source}")]
    Balance {
        /// The account being reconstructed.
        account: String,
        /// The arithmetic failure.
        #[source]
        source: BalanceError,
    },

    /// The structural patterns failed to compile.
    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl ExportError {
    /// The I/O error kind behind this failure, if any.
    #[must_use]
    pub fn io_kind(&self) -> Option<io::ErrorKind> {
        match self {
            Self::ReadInput { source, .. }
            | Self::CreateDir { source, .. }
            | Self::CreateFile { source, .. }
            | Self::Write { source, .. } => Some(source.kind()),
            Self::MappingFile { source, .. } => match source.kind() {
                csv::ErrorKind::Io(err) => Some(err.kind()),
                _ => None,
            },
            Self::Encode { .. }
            | Self::UnknownAccount { .. }
            | Self::Balance { .. }
            | Self::Parse(_) => None,
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }
}
