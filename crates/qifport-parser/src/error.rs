//! Parser errors.

use thiserror::Error;

/// Errors building a [`QifParser`](crate::QifParser).
///
/// Malformed input never produces an error: unrecognized blocks and
/// transactions are skipped. Only the structural patterns themselves can fail.
#[derive(Debug, Error)]
pub enum ParseError {
    /// A structural pattern failed to compile.
    #[error("failed to compile {pattern} pattern: {source}")]
    Pattern {
        /// Which pattern failed.
        pattern: &'static str,
        /// The regex compilation error.
        #[source]
        source: Box<regex::Error>,
    },
}

impl ParseError {
    pub(crate) fn pattern(pattern: &'static str, source: regex::Error) -> Self {
        Self::Pattern {
            pattern,
            source: Box::new(source),
        }
    }
}
