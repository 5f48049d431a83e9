//! Structural QIF parser.
//!
//! This crate finds Bank and credit card account blocks in a QIF export and
//! extracts one typed [`RawTransaction`] per transaction entry. It performs no
//! normalization; see [`qifport_core::normalize`] for that.
//!
//! Parsing is best effort. Unrecognized sections and malformed entries are
//! skipped rather than reported, so the only error is a pattern that fails to
//! compile.
//!
//! # Example
//!
//! ```
//! use qifport_parser::{normalize_line_endings, QifParser};
//!
//! let source = normalize_line_endings(
//!     "!Account\r\nNChecking Account\r\nTBank\r\n^\r\n!Type:Bank\r\n\
//!      D1/15'23\r\nU-45.23\r\nT-45.23\r\nCX\r\nPGrocery Store\r\nLFood:Groceries\r\n^\r\n",
//! );
//!
//! let parser = QifParser::new().unwrap();
//! let block = parser.blocks(&source).next().unwrap();
//! assert_eq!(block.name, "Checking Account");
//!
//! let txns: Vec<_> = parser.transactions(&source, &block).collect();
//! assert_eq!(txns.len(), 1);
//! assert_eq!(txns[0].value.payee, Some("Grocery Store"));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod block;
mod error;
mod span;
mod transaction;

pub use block::{AccountBlock, BlockLocator, Blocks};
pub use error::ParseError;
pub use span::{Span, Spanned};
pub use transaction::{TransactionParser, Transactions};

pub use qifport_core::{AccountKind, RawTransaction};

use std::borrow::Cow;

/// Convert `\r\n` line endings to `\n`.
///
/// The structural patterns are line anchored, so this must run before any
/// other parsing. Text without carriage-return line endings is borrowed.
pub fn normalize_line_endings(source: &str) -> Cow<'_, str> {
    if source.contains("\r\n") {
        Cow::Owned(source.replace("\r\n", "\n"))
    } else {
        Cow::Borrowed(source)
    }
}

/// Block locator and transaction parser, compiled once per run.
#[derive(Debug, Clone)]
pub struct QifParser {
    locator: BlockLocator,
    transactions: TransactionParser,
}

impl QifParser {
    /// Compile all structural patterns.
    pub fn new() -> Result<Self, ParseError> {
        Ok(Self {
            locator: BlockLocator::new()?,
            transactions: TransactionParser::new()?,
        })
    }

    /// Lazily iterate the Bank and credit card account blocks of `source`.
    pub fn blocks<'a>(&'a self, source: &'a str) -> Blocks<'a> {
        self.locator.locate(source)
    }

    /// Iterate the transactions of one located block.
    pub fn transactions<'a>(
        &'a self,
        source: &'a str,
        block: &AccountBlock<'a>,
    ) -> Transactions<'a> {
        self.transactions.parse(source, block)
    }
}
