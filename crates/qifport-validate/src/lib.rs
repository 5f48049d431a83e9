//! Data quality tracking for qifport exports.
//!
//! [`ValidationTracker`] implements [`qifport_core::Observer`] and is handed to
//! the export pipeline. It counts suspicious records, groups duplicate
//! candidates, and records mapping lookups. At the end of a run it produces a
//! [`ValidationReport`] for the human-readable summary and the JSON log.
//!
//! # Issue Codes
//!
//! | Code | Description |
//! |------|-------------|
//! | V1001 | Transaction has no payee |
//! | V1002 | Transaction has no category |
//! | V1003 | Transaction amount is zero |
//! | V1004 | Duplicate candidate (same date, payee, amount) |
//! | V2001 | Transaction rejected: amount does not parse |
//! | V2002 | Transaction rejected: date is not a calendar date |
//! | V3001 | Value has no entry in a loaded mapping table |
//! | V3002 | Mapping entry never matched |

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod report;
mod tracker;

pub use report::{DuplicateGroup, LogError, ValidationReport};
pub use tracker::ValidationTracker;

use chrono::NaiveDate;
use qifport_core::RejectReason;
use serde::{Serialize, Serializer};
use std::fmt;

/// Validation issue codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IssueCode {
    // === Record quality (V1xxx) ===
    /// V1001: Transaction has no payee.
    MissingPayee,
    /// V1002: Transaction has no category.
    MissingCategory,
    /// V1003: Transaction amount is zero.
    ZeroAmount,
    /// V1004: Several transactions share date, payee, and amount.
    DuplicateCandidate,

    // === Rejections (V2xxx) ===
    /// V2001: Amount does not parse as a number.
    InvalidAmount,
    /// V2002: Date is not a real calendar date.
    InvalidDate,

    // === Mapping (V3xxx) ===
    /// V3001: Value looked up in a loaded table without an entry.
    UnmappedValue,
    /// V3002: Table entry never matched during the run.
    UnusedMapping,
}

impl IssueCode {
    /// Get the code string (e.g., "V1001").
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::MissingPayee => "V1001",
            Self::MissingCategory => "V1002",
            Self::ZeroAmount => "V1003",
            Self::DuplicateCandidate => "V1004",
            Self::InvalidAmount => "V2001",
            Self::InvalidDate => "V2002",
            Self::UnmappedValue => "V3001",
            Self::UnusedMapping => "V3002",
        }
    }

    /// Whether the record was dropped from the output.
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        matches!(self, Self::InvalidAmount | Self::InvalidDate)
    }

    /// Get the severity level.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        match self {
            Self::InvalidAmount | Self::InvalidDate => Severity::Error,
            Self::UnusedMapping => Severity::Info,
            _ => Severity::Warning,
        }
    }
}

impl From<&RejectReason> for IssueCode {
    fn from(reason: &RejectReason) -> Self {
        match reason {
            RejectReason::InvalidAmount(_) => Self::InvalidAmount,
            RejectReason::InvalidDate(_) => Self::InvalidDate,
        }
    }
}

impl fmt::Display for IssueCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl Serialize for IssueCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

/// Severity level for validation issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The record was dropped.
    Error,
    /// Exported, but worth reviewing.
    Warning,
    /// Informational only.
    Info,
}

/// One recorded issue, as written to the validation log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    /// Issue code.
    pub code: IssueCode,
    /// Severity of the issue.
    pub severity: Severity,
    /// Human-readable description.
    pub message: String,
    /// Output account the record belongs to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
    /// Transaction date, when it could be determined.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
}

impl Issue {
    /// Create a new issue.
    #[must_use]
    pub fn new(code: IssueCode, message: impl Into<String>) -> Self {
        Self {
            code,
            severity: code.severity(),
            message: message.into(),
            account: None,
            date: None,
        }
    }

    /// Attach the account name.
    #[must_use]
    pub fn with_account(mut self, account: impl Into<String>) -> Self {
        self.account = Some(account.into());
        self
    }

    /// Attach the transaction date.
    #[must_use]
    pub const fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}
