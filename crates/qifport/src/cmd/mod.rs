//! Command implementations for the qifport binaries.
//!
//! Each module contains the full implementation for a command,
//! which is invoked by a thin wrapper binary.

pub mod account_stats;
pub mod balance_history;
pub mod transactions;
