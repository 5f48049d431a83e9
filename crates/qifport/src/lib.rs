//! Command-line tools for converting Quicken QIF exports.
//!
//! This crate provides the qifport binaries:
//!
//! - `qifport-transactions`: Export transactions as CSV, JSON, or XML
//! - `qifport-balance-history`: Reconstruct the daily balance of one account
//! - `qifport-account-stats`: List accounts with transaction counts and date ranges
//!
//! # Example Usage
//!
//! ```bash
//! qifport-account-stats -i export.qif
//! qifport-transactions -i export.qif -o out -f monarch -c categories.csv
//! qifport-balance-history -i export.qif -A Checking --current-balance 2500.00
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod args;
pub mod cmd;
pub mod logging;
pub mod report;
