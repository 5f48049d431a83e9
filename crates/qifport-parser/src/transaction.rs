//! Transaction record extraction.
//!
//! A transaction entry is a fixed sequence of marker lines:
//!
//! | Marker | Field | Required |
//! |--------|-------|----------|
//! | `D` | date as `M/D'YY`, optional space before the day | yes |
//! | `U` | user amount | yes |
//! | `T` | amount | yes |
//! | `C` | cleared status | yes |
//! | `N` | check number | no |
//! | `P` | payee | no |
//! | `M` | memo | no |
//! | `L` | category, optionally `Category/Tag` | yes |
//!
//! Entries missing a required marker do not match and are skipped.

use crate::block::AccountBlock;
use crate::error::ParseError;
use crate::span::{Span, Spanned};
use qifport_core::RawTransaction;
use regex::{CaptureMatches, Captures, Regex};

const TRANSACTION_PATTERN: &str = concat!(
    r"D(?P<month>[0-9]{1,2})/ ?(?P<day>[0-9]{1,2})'(?P<year>[0-9]{2})[\r\n]+",
    r"U(?P<user_amount>.*?)[\r\n]+",
    r"T(?P<amount>.*?)[\r\n]+",
    r"C(?P<cleared>.*?)[\r\n]+",
    r"(?:N(?P<number>.*?)[\r\n]+)?",
    r"(?:P(?P<payee>.*?)[\r\n]+)?",
    r"(?:M(?P<memo>.*?)[\r\n]+)?",
    r"L(?P<category>.*?)[\r\n]+",
);

/// Extracts [`RawTransaction`]s from an account block body.
#[derive(Debug, Clone)]
pub struct TransactionParser {
    pattern: Regex,
}

impl TransactionParser {
    /// Compile the transaction pattern.
    pub fn new() -> Result<Self, ParseError> {
        let pattern =
            Regex::new(TRANSACTION_PATTERN).map_err(|e| ParseError::pattern("transaction", e))?;
        Ok(Self { pattern })
    }

    /// Iterate the transactions in `block`, in file order.
    ///
    /// Spans are absolute offsets into `source`.
    pub fn parse<'a>(&'a self, source: &'a str, block: &AccountBlock<'a>) -> Transactions<'a> {
        Transactions {
            matches: self.pattern.captures_iter(block.body_text(source)),
            offset: block.body.start,
        }
    }

    /// Iterate the transactions in a standalone section of text.
    pub fn parse_text<'a>(&'a self, text: &'a str) -> Transactions<'a> {
        Transactions {
            matches: self.pattern.captures_iter(text),
            offset: 0,
        }
    }
}

/// Iterator over the transactions of one block.
#[derive(Debug)]
pub struct Transactions<'a> {
    matches: CaptureMatches<'a, 'a>,
    offset: usize,
}

impl<'a> Iterator for Transactions<'a> {
    type Item = Spanned<RawTransaction<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let caps = self.matches.next()?;
            if let Some(spanned) = raw_transaction(&caps, self.offset) {
                return Some(spanned);
            }
        }
    }
}

fn raw_transaction<'a>(caps: &Captures<'a>, offset: usize) -> Option<Spanned<RawTransaction<'a>>> {
    let whole = caps.get(0)?;

    let raw = RawTransaction {
        month: group(caps, "month")?,
        day: group(caps, "day")?,
        year: group(caps, "year")?,
        user_amount: group(caps, "user_amount")?,
        amount: group(caps, "amount")?,
        cleared: group(caps, "cleared")?,
        number: group(caps, "number"),
        payee: group(caps, "payee"),
        memo: group(caps, "memo"),
        category: group(caps, "category")?,
    };
    Some(Spanned::new(
        raw,
        Span::new(whole.start(), whole.end()).offset(offset),
    ))
}

fn group<'a>(caps: &Captures<'a>, name: &str) -> Option<&'a str> {
    caps.name(name).map(|m| m.as_str())
}
