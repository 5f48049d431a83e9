//! Integration tests for the validation crate.
//!
//! Tests cover the tracker as an observer of the mapping engine, concurrent
//! producers, and the JSON log.

use chrono::NaiveDate;
use proptest::prelude::*;
use qifport_core::{
    normalize, MappingKind, MappingTable, Mappings, Observer, RawTransaction, TransactionRecord,
};
use qifport_validate::{IssueCode, ValidationTracker};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::thread;

// ============================================================================
// Helper Functions
// ============================================================================

fn record(day: u32, merchant: &str, amount: Decimal) -> TransactionRecord {
    TransactionRecord {
        date: NaiveDate::from_ymd_opt(2023, 6, day).unwrap(),
        merchant: merchant.to_string(),
        category: "Misc".to_string(),
        account: "Checking".to_string(),
        original_statement: merchant.to_string(),
        notes: String::new(),
        amount,
        tags: String::new(),
    }
}

fn raw<'a>(payee: Option<&'a str>, amount: &'a str, category: &'a str) -> RawTransaction<'a> {
    RawTransaction {
        month: "6",
        day: "1",
        year: "23",
        user_amount: amount,
        amount,
        cleared: "",
        number: None,
        payee,
        memo: None,
        category,
    }
}

// ============================================================================
// Pipeline Observation
// ============================================================================

#[test]
fn test_tracks_normalize_and_map_stages() {
    let mut mappings = Mappings::default();
    mappings.set(
        MappingKind::Category,
        MappingTable::from_pairs([("Food:Groceries", "Groceries"), ("Auto", "Car")]),
    );
    mappings.set(MappingKind::Tag, MappingTable::from_pairs([("Trip", "Vacation")]));

    let tracker = ValidationTracker::new();
    let inputs = [
        raw(Some("Grocer"), "-10.00", "Food:Groceries"),
        raw(None, "0.00", "Food:Groceries/Trip"),
        raw(Some("Shop"), "ten", "Misc"),
        raw(Some("Gym"), "-30.00", "Health"),
    ];

    for input in &inputs {
        match normalize(input) {
            Ok(txn) => {
                let record = txn.map(&mappings, &tracker).into_record("Checking", true);
                tracker.transaction_admitted(&record);
            }
            Err(reason) => tracker.transaction_rejected("Checking", &reason),
        }
    }

    let report = tracker.report(&mappings);
    assert_eq!(report.total_transactions, 3);
    assert_eq!(report.rejected_transactions, 1);
    assert_eq!(report.missing_payees, 1);
    assert_eq!(report.zero_amounts, 1);
    assert_eq!(report.unmatched.get("category:Health"), Some(&1));
    assert_eq!(
        report.unused_mappings.get("category"),
        Some(&vec!["Auto".to_string()])
    );
    assert!(!report.unused_mappings.contains_key("tag"));
    // Empty tags are never looked up.
    assert!(report.unmatched.keys().all(|k| k != "tag:"));

    let codes: Vec<_> = report.issues.iter().map(|i| i.code).collect();
    assert_eq!(codes, vec![IssueCode::ZeroAmount, IssueCode::InvalidAmount]);
}

// ============================================================================
// Concurrency
// ============================================================================

#[test]
fn test_concurrent_producers_lose_no_updates() {
    let tracker = ValidationTracker::new();
    let mappings = Mappings::default();

    thread::scope(|scope| {
        for worker in 0..8u32 {
            let tracker = &tracker;
            scope.spawn(move || {
                for i in 0..500u32 {
                    let day = 1 + (i % 28);
                    tracker.transaction_admitted(&record(day, &format!("Payee {worker}"), dec!(0)));
                    tracker.mapping_miss(MappingKind::Payee, "Unknown");
                }
            });
        }
    });

    let report = tracker.report(&mappings);
    assert_eq!(report.total_transactions, 4000);
    assert_eq!(report.zero_amounts, 4000);
    assert_eq!(report.issues.len(), 4000);
    assert_eq!(report.unmatched.get("payee:Unknown"), Some(&4000));
    let grouped: usize = report.duplicates.iter().map(|d| d.count).sum();
    assert_eq!(grouped, 4000);
}

// ============================================================================
// Validation Log
// ============================================================================

#[test]
fn test_write_log_is_pretty_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("transactions_validation.log");

    let tracker = ValidationTracker::new();
    tracker.transaction_admitted(&record(1, "Cafe", dec!(-4.50)));
    tracker.transaction_admitted(&record(1, "Cafe", dec!(-4.50)));

    tracker.report(&Mappings::default()).write_log(&path).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("{\n  \"total_transactions\": 2,"));
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["duplicates"][0]["merchant"], "Cafe");
    assert_eq!(value["duplicates"][0]["date"], "2023-06-01");
    assert_eq!(value["duplicates"][0]["count"], 2);
}

#[test]
fn test_write_log_reports_missing_directory() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("validation.log");

    let err = ValidationTracker::new()
        .report(&Mappings::default())
        .write_log(&path)
        .unwrap_err();
    assert!(err.to_string().contains("failed to write validation log"));
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_duplicate_counts_cover_repeated_records(
        days in prop::collection::vec(1u32..5u32, 1..60),
    ) {
        let tracker = ValidationTracker::new();
        for day in &days {
            tracker.transaction_admitted(&record(*day, "Cafe", dec!(-1.00)));
        }

        let report = tracker.report(&Mappings::default());
        let mut expected: Vec<(u32, usize)> = (1u32..5)
            .map(|d| (d, days.iter().filter(|x| **x == d).count()))
            .filter(|(_, n)| *n > 1)
            .collect();
        expected.sort_unstable();

        let actual: Vec<(u32, usize)> = report
            .duplicates
            .iter()
            .map(|g| (chrono::Datelike::day(&g.date), g.count))
            .collect();
        prop_assert_eq!(actual, expected);
        prop_assert_eq!(report.total_transactions, days.len());
    }
}
