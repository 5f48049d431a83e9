//! Core types for qifport
//!
//! This crate provides the fundamental types and pure transformations shared by
//! the qifport pipeline:
//!
//! - [`RawTransaction`] - Substrings captured for one QIF transaction entry
//! - [`TransactionRecord`] - The canonical, exported transaction row
//! - [`normalize()`] - Converts a raw match into canonical fields
//! - [`MappingTable`] / [`Mappings`] - Rename tables for accounts, categories, payees, and tags
//! - [`DateRange`] - Inclusive date admission test
//! - [`Observer`] - Side channel for validation bookkeeping
//! - [`BalanceAnchor`] / [`DailyDeltas`] - Balance history reconstruction
//!
//! # Example
//!
//! ```
//! use qifport_core::{normalize, RawTransaction};
//!
//! let raw = RawTransaction {
//!     month: "1",
//!     day: "15",
//!     year: "23",
//!     user_amount: "-1,045.20",
//!     amount: "-1,045.20",
//!     cleared: "X",
//!     number: None,
//!     payee: Some("Grocery Store"),
//!     memo: None,
//!     category: "Food:Groceries/Weekly",
//! };
//!
//! let txn = normalize(&raw).unwrap();
//! assert_eq!(txn.date.to_string(), "2023-01-15");
//! assert_eq!(txn.amount.to_string(), "-1045.20");
//! assert_eq!(txn.category, "Food:Groceries");
//! assert_eq!(txn.tag, "Weekly");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod amount;
pub mod balance;
pub mod filter;
pub mod mapping;
pub mod normalize;
pub mod observer;
pub mod record;

pub use amount::{format_amount, parse_amount};
pub use balance::{reconstruct, AnchorError, BalanceAnchor, BalanceError, DailyDeltas};
pub use filter::{DateRange, DateRangeError};
pub use mapping::{MappingKind, MappingTable, Mappings};
pub use normalize::{
    canonical_date, clean_payee, normalize, split_category_and_tag, NormalizedTransaction,
    RejectReason, IMPORT_TAG,
};
pub use observer::{NoopObserver, Observer};
pub use record::{
    AccountKind, BalanceRecord, Column, RawTransaction, TransactionRecord, DEFAULT_COLUMNS,
};
