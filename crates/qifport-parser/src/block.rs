//! Account block location.
//!
//! An account block starts with a structural header:
//!
//! ```text
//! !Account
//! NChecking Account
//! TBank
//! ^
//! !Type:Bank
//! ```
//!
//! and its body runs until the next line declaring a `!Type:` section, or the
//! end of the input.

use crate::error::ParseError;
use crate::span::Span;
use qifport_core::AccountKind;
use regex::{CaptureMatches, Regex};

const HEADER_PATTERN: &str =
    r"(?m)^!Account[^\n]*\n^N(?P<name>[^\n]*?)\n^T(?P<type>[^\n]*?)\n^\^\n^!Type:(?P<kind>Bank|CCard)[ \t]*\n";

const TYPE_MARKER_PATTERN: &str = r"(?mi)^[ \t]*!Type:";

/// One located Bank or credit card account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountBlock<'a> {
    /// Account name from the `N` line of the header.
    pub name: &'a str,
    /// Account kind from the `!Type:` line closing the header.
    pub kind: AccountKind,
    /// Span of the structural header.
    pub header: Span,
    /// Span of the transaction section following the header.
    pub body: Span,
}

impl<'a> AccountBlock<'a> {
    /// The transaction section text.
    #[must_use]
    pub fn body_text(&self, source: &'a str) -> &'a str {
        self.body.text(source)
    }
}

/// Finds account blocks in normalized QIF text.
#[derive(Debug, Clone)]
pub struct BlockLocator {
    header: Regex,
    type_marker: Regex,
}

impl BlockLocator {
    /// Compile the header and section marker patterns.
    pub fn new() -> Result<Self, ParseError> {
        Ok(Self {
            header: Regex::new(HEADER_PATTERN)
                .map_err(|e| ParseError::pattern("account header", e))?,
            type_marker: Regex::new(TYPE_MARKER_PATTERN)
                .map_err(|e| ParseError::pattern("type marker", e))?,
        })
    }

    /// Lazily iterate the account blocks of `source` in file order.
    ///
    /// Yields nothing when no header matches. Calling this again restarts the
    /// scan from the beginning.
    pub fn locate<'a>(&'a self, source: &'a str) -> Blocks<'a> {
        Blocks {
            locator: self,
            source,
            headers: self.header.captures_iter(source),
        }
    }

    fn section_end(&self, source: &str, from: usize) -> usize {
        self.type_marker
            .find(&source[from..])
            .map_or(source.len(), |m| from + m.start())
    }
}

/// Iterator over the account blocks of one source text.
#[derive(Debug)]
pub struct Blocks<'a> {
    locator: &'a BlockLocator,
    source: &'a str,
    headers: CaptureMatches<'a, 'a>,
}

impl<'a> Iterator for Blocks<'a> {
    type Item = AccountBlock<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let caps = self.headers.next()?;
            let (Some(whole), Some(name), Some(kind)) =
                (caps.get(0), caps.name("name"), caps.name("kind"))
            else {
                continue;
            };
            let Some(kind) = AccountKind::from_qif(kind.as_str()) else {
                continue;
            };

            let body_start = whole.end();
            let body_end = self.locator.section_end(self.source, body_start);
            return Some(AccountBlock {
                name: name.as_str(),
                kind,
                header: Span::new(whole.start(), whole.end()),
                body: Span::new(body_start, body_end),
            });
        }
    }
}
