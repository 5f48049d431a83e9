//! The shared validation counter set.

use crate::report::{DuplicateGroup, ValidationReport};
use crate::{Issue, IssueCode};
use chrono::NaiveDate;
use parking_lot::Mutex;
use qifport_core::{MappingKind, Mappings, Observer, RejectReason, TransactionRecord};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Default)]
struct TrackerState {
    admitted: usize,
    filtered: usize,
    missing_payees: usize,
    missing_categories: usize,
    zero_amounts: usize,
    rejections: BTreeMap<&'static str, usize>,
    issues: Vec<Issue>,
    candidates: BTreeMap<(NaiveDate, String, Decimal), usize>,
    matched: BTreeMap<MappingKind, BTreeSet<String>>,
    unmatched: BTreeMap<String, usize>,
}

impl TrackerState {
    fn rejected(&self) -> usize {
        self.rejections.values().sum()
    }

    fn duplicate_groups(&self) -> Vec<DuplicateGroup> {
        self.candidates
            .iter()
            .filter(|(_, count)| **count > 1)
            .map(|((date, merchant, amount), count)| DuplicateGroup {
                date: *date,
                merchant: merchant.clone(),
                amount: *amount,
                count: *count,
            })
            .collect()
    }

    fn unused_mappings(&self, mappings: &Mappings) -> BTreeMap<String, Vec<String>> {
        let mut unused = BTreeMap::new();
        for kind in MappingKind::ALL {
            let Some(table) = mappings.table(kind) else {
                continue;
            };
            let matched = self.matched.get(&kind);
            let never: Vec<String> = table
                .sources()
                .filter(|source| !matched.is_some_and(|m| m.contains(*source)))
                .map(str::to_string)
                .collect();
            if !never.is_empty() {
                unused.insert(kind.name().to_string(), never);
            }
        }
        unused
    }
}

/// Thread-safe validation bookkeeping for one pipeline run.
///
/// Every update and every read that inspects several counters takes the same
/// lock, so a report is always a consistent snapshot.
#[derive(Debug, Default)]
pub struct ValidationTracker {
    state: Mutex<TrackerState>,
}

impl ValidationTracker {
    /// Create an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records admitted so far.
    pub fn admitted(&self) -> usize {
        self.state.lock().admitted
    }

    /// Number of records rejected so far.
    pub fn rejected(&self) -> usize {
        self.state.lock().rejected()
    }

    /// Whether anything has been recorded that the summary would report.
    ///
    /// Unused mapping entries are only known once the run is over; see
    /// [`ValidationReport::has_warnings`].
    pub fn has_warnings(&self) -> bool {
        let state = self.state.lock();
        state.missing_payees > 0
            || state.missing_categories > 0
            || state.zero_amounts > 0
            || state.rejected() > 0
            || state.candidates.values().any(|count| *count > 1)
            || !state.unmatched.is_empty()
    }

    /// Snapshot the counters into a report.
    ///
    /// `mappings` are the tables used for the run; their entries that never
    /// matched are listed as unused.
    pub fn report(&self, mappings: &Mappings) -> ValidationReport {
        let state = self.state.lock();
        ValidationReport {
            total_transactions: state.admitted,
            filtered_transactions: state.filtered,
            rejected_transactions: state.rejected(),
            missing_payees: state.missing_payees,
            missing_categories: state.missing_categories,
            zero_amounts: state.zero_amounts,
            rejections: state
                .rejections
                .iter()
                .map(|(code, count)| ((*code).to_string(), *count))
                .collect(),
            duplicates: state.duplicate_groups(),
            unused_mappings: state.unused_mappings(mappings),
            unmatched: state.unmatched.clone(),
            issues: state.issues.clone(),
        }
    }
}

impl Observer for ValidationTracker {
    fn transaction_admitted(&self, record: &TransactionRecord) {
        let mut state = self.state.lock();
        state.admitted += 1;
        if record.merchant.is_empty() {
            state.missing_payees += 1;
        }
        if record.category.is_empty() {
            state.missing_categories += 1;
        }
        if record.amount.is_zero() {
            state.zero_amounts += 1;
            let merchant = if record.merchant.is_empty() {
                "(no payee)"
            } else {
                record.merchant.as_str()
            };
            state.issues.push(
                Issue::new(IssueCode::ZeroAmount, format!("zero amount for {merchant}"))
                    .with_account(&record.account)
                    .with_date(record.date),
            );
        }
        *state
            .candidates
            .entry((record.date, record.merchant.clone(), record.amount))
            .or_insert(0) += 1;
    }

    fn transaction_filtered(&self, _record: &TransactionRecord) {
        self.state.lock().filtered += 1;
    }

    fn transaction_rejected(&self, account: &str, reason: &RejectReason) {
        tracing::trace!(account, %reason, "transaction rejected");
        let mut state = self.state.lock();
        *state.rejections.entry(reason.code()).or_insert(0) += 1;
        state
            .issues
            .push(Issue::new(IssueCode::from(reason), reason.to_string()).with_account(account));
    }

    fn mapping_hit(&self, kind: MappingKind, source: &str) {
        let mut state = self.state.lock();
        let matched = state.matched.entry(kind).or_default();
        if !matched.contains(source) {
            matched.insert(source.to_string());
        }
    }

    fn mapping_miss(&self, kind: MappingKind, value: &str) {
        *self
            .state
            .lock()
            .unmatched
            .entry(format!("{kind}:{value}"))
            .or_insert(0) += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qifport_core::MappingTable;
    use rust_decimal_macros::dec;

    fn record(day: u32, merchant: &str, category: &str, amount: Decimal) -> TransactionRecord {
        TransactionRecord {
            date: NaiveDate::from_ymd_opt(2023, 1, day).unwrap(),
            merchant: merchant.to_string(),
            category: category.to_string(),
            account: "Checking".to_string(),
            original_statement: merchant.to_string(),
            notes: String::new(),
            amount,
            tags: String::new(),
        }
    }

    #[test]
    fn test_counts_record_quality() {
        let tracker = ValidationTracker::new();
        tracker.transaction_admitted(&record(1, "", "Food", dec!(-1.00)));
        tracker.transaction_admitted(&record(2, "Cafe", "", dec!(0.00)));
        tracker.transaction_filtered(&record(3, "Cafe", "Food", dec!(-2.00)));

        let report = tracker.report(&Mappings::default());
        assert_eq!(report.total_transactions, 2);
        assert_eq!(report.filtered_transactions, 1);
        assert_eq!(report.missing_payees, 1);
        assert_eq!(report.missing_categories, 1);
        assert_eq!(report.zero_amounts, 1);
        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].code, IssueCode::ZeroAmount);
        assert!(tracker.has_warnings());
    }

    #[test]
    fn test_duplicate_candidates() {
        let tracker = ValidationTracker::new();
        for _ in 0..3 {
            tracker.transaction_admitted(&record(5, "Cafe", "Food", dec!(-4.50)));
        }
        tracker.transaction_admitted(&record(5, "Cafe", "Food", dec!(-4.75)));

        let report = tracker.report(&Mappings::default());
        assert_eq!(report.duplicates.len(), 1);
        assert_eq!(report.duplicates[0].count, 3);
        assert_eq!(report.duplicates[0].amount, dec!(-4.50));
    }

    #[test]
    fn test_rejections_by_code() {
        let tracker = ValidationTracker::new();
        tracker.transaction_rejected("Checking", &RejectReason::InvalidAmount("x".into()));
        tracker.transaction_rejected("Checking", &RejectReason::InvalidAmount("y".into()));
        tracker.transaction_rejected("Visa", &RejectReason::InvalidDate("2023-02-30".into()));

        assert_eq!(tracker.rejected(), 3);
        let report = tracker.report(&Mappings::default());
        assert_eq!(report.rejections.get("invalid-amount"), Some(&2));
        assert_eq!(report.rejections.get("invalid-date"), Some(&1));
        assert_eq!(report.issues[2].account.as_deref(), Some("Visa"));
    }

    #[test]
    fn test_unused_and_unmatched_mappings() {
        let mut mappings = Mappings::default();
        mappings.set(
            MappingKind::Payee,
            MappingTable::from_pairs([("AMZN", "Amazon"), ("SBUX", "Starbucks")]),
        );

        let tracker = ValidationTracker::new();
        let observer: &dyn Observer = &tracker;
        assert_eq!(mappings.apply(MappingKind::Payee, "AMZN", observer), "Amazon");
        assert_eq!(mappings.apply(MappingKind::Payee, "Cafe", observer), "Cafe");
        assert_eq!(mappings.apply(MappingKind::Payee, "Cafe", observer), "Cafe");
        assert_eq!(mappings.apply(MappingKind::Category, "Food", observer), "Food");

        let report = tracker.report(&mappings);
        assert_eq!(
            report.unused_mappings.get("payee"),
            Some(&vec!["SBUX".to_string()])
        );
        assert_eq!(report.unmatched.get("payee:Cafe"), Some(&2));
        assert!(!report.unmatched.contains_key("category:Food"));
    }

    #[test]
    fn test_empty_tracker_has_no_warnings() {
        let tracker = ValidationTracker::new();
        assert!(!tracker.has_warnings());
        assert!(!tracker.report(&Mappings::default()).has_warnings());
    }
}
