//! Field normalization.
//!
//! Turns the captured substrings of a [`RawTransaction`] into canonical values.
//! Normalization is pure: mapping and validation bookkeeping happen in later
//! stages ([`NormalizedTransaction::map`] and the [`Observer`]).

use crate::amount::{format_amount, parse_amount};
use crate::mapping::{MappingKind, Mappings};
use crate::observer::Observer;
use crate::record::{RawTransaction, TransactionRecord};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

/// Sentinel tag prepended to every record when tagging for import is enabled.
pub const IMPORT_TAG: &str = "QIFIMPORT";

/// Why a transaction was rejected during normalization.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RejectReason {
    /// The amount did not parse as a decimal number.
    #[error("invalid amount '{0}'")]
    InvalidAmount(String),
    /// The canonical date is not a real calendar date.
    #[error("invalid date '{0}'")]
    InvalidDate(String),
}

impl RejectReason {
    /// Short identifier used when aggregating rejections.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidAmount(_) => "invalid-amount",
            Self::InvalidDate(_) => "invalid-date",
        }
    }
}

/// A transaction whose fields have been normalized but not yet mapped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedTransaction {
    /// Parsed canonical date.
    pub date: NaiveDate,
    /// Amount rounded to two decimal places.
    pub amount: Decimal,
    /// Trimmed payee with double quotes removed; empty when absent.
    pub payee: String,
    /// Trimmed memo; empty when absent.
    pub memo: String,
    /// Trimmed category (text before the first `/`).
    pub category: String,
    /// Trimmed tag (text after the first `/`); empty when there is no `/`.
    pub tag: String,
}

/// Build the canonical `YYYY-MM-DD` date string.
///
/// Month and day are zero padded to two digits. The year is always placed in
/// the 2000s, so dates before 2000 cannot be represented.
///
/// ```
/// use qifport_core::canonical_date;
///
/// assert_eq!(canonical_date("1", " 5", "23"), "2023-01-05");
/// assert_eq!(canonical_date("12", "31", "09"), "2009-12-31");
/// ```
pub fn canonical_date(month: &str, day: &str, year: &str) -> String {
    format!("20{}-{}-{}", year.trim(), pad2(month), pad2(day))
}

fn pad2(value: &str) -> String {
    let padded: Vec<char> = format!("0{}", value.trim()).chars().collect();
    padded[padded.len().saturating_sub(2)..].iter().collect()
}

/// Split a raw `L` field into category and tag on the first `/` only.
///
/// Everything after the first `/`, including further slashes, belongs to the
/// tag. Neither side is trimmed here, so `category + "/" + tag` always
/// reproduces the input when a slash is present.
///
/// ```
/// use qifport_core::split_category_and_tag;
///
/// assert_eq!(split_category_and_tag("Food/Trip/2023"), ("Food", "Trip/2023"));
/// assert_eq!(split_category_and_tag("Food"), ("Food", ""));
/// ```
pub fn split_category_and_tag(raw: &str) -> (&str, &str) {
    raw.split_once('/').unwrap_or((raw, ""))
}

/// Trim a payee and strip embedded double quotes.
pub fn clean_payee(raw: &str) -> String {
    raw.trim().replace('"', "")
}

/// Normalize one raw transaction.
///
/// Missing payee and memo become empty strings. An unparseable amount or an
/// impossible date rejects the transaction.
pub fn normalize(raw: &RawTransaction<'_>) -> Result<NormalizedTransaction, RejectReason> {
    let date_text = canonical_date(raw.month, raw.day, raw.year);
    let date = NaiveDate::parse_from_str(&date_text, "%Y-%m-%d")
        .map_err(|_| RejectReason::InvalidDate(date_text.clone()))?;

    let amount = parse_amount(raw.user_amount)
        .and_then(format_amount)
        .ok_or_else(|| RejectReason::InvalidAmount(raw.user_amount.trim().to_string()))?;

    let (category, tag) = split_category_and_tag(raw.category.trim());

    Ok(NormalizedTransaction {
        date,
        amount,
        payee: clean_payee(raw.payee.unwrap_or_default()),
        memo: raw.memo.unwrap_or_default().trim().to_string(),
        category: category.trim().to_string(),
        tag: tag.trim().to_string(),
    })
}

impl NormalizedTransaction {
    /// Apply the payee, category, and tag mapping tables.
    pub fn map(mut self, mappings: &Mappings, observer: &dyn Observer) -> Self {
        self.payee = mappings.apply(MappingKind::Payee, &self.payee, observer);
        self.category = mappings.apply(MappingKind::Category, &self.category, observer);
        self.tag = mappings.apply(MappingKind::Tag, &self.tag, observer);
        self
    }

    /// Produce the exported record for `account`.
    ///
    /// When `import_tag` is set, [`IMPORT_TAG`] is prepended to the tag list.
    pub fn into_record(self, account: &str, import_tag: bool) -> TransactionRecord {
        let tags = match (import_tag, self.tag.is_empty()) {
            (true, true) => IMPORT_TAG.to_string(),
            (true, false) => format!("{IMPORT_TAG},{}", self.tag),
            (false, _) => self.tag,
        };

        TransactionRecord {
            date: self.date,
            original_statement: self.payee.clone(),
            merchant: self.payee,
            category: self.category,
            account: account.to_string(),
            notes: self.memo,
            amount: self.amount,
            tags,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::MappingTable;
    use crate::observer::NoopObserver;
    use rust_decimal_macros::dec;

    fn raw<'a>() -> RawTransaction<'a> {
        RawTransaction {
            month: "1",
            day: "15",
            year: "23",
            user_amount: "-45.23",
            amount: "-45.23",
            cleared: "X",
            number: None,
            payee: Some("Grocery Store"),
            memo: None,
            category: "Food:Groceries",
        }
    }

    #[test]
    fn test_canonical_date_padding() {
        assert_eq!(canonical_date("1", "5", "23"), "2023-01-05");
        assert_eq!(canonical_date("10", "25", "99"), "2099-10-25");
        assert_eq!(canonical_date(" 3", " 7", "00"), "2000-03-07");
    }

    #[test]
    fn test_split_category_and_tag() {
        assert_eq!(split_category_and_tag("Food:Dining"), ("Food:Dining", ""));
        assert_eq!(split_category_and_tag("Food/Vacation"), ("Food", "Vacation"));
        assert_eq!(split_category_and_tag("A/B/C"), ("A", "B/C"));
        assert_eq!(split_category_and_tag("/Tag"), ("", "Tag"));
        assert_eq!(split_category_and_tag(""), ("", ""));
    }

    #[test]
    fn test_clean_payee() {
        assert_eq!(clean_payee("  Joe's \"Best\" Diner "), "Joe's Best Diner");
        assert_eq!(clean_payee(""), "");
    }

    #[test]
    fn test_normalize_scenario() {
        let txn = normalize(&raw()).unwrap();
        assert_eq!(txn.date, NaiveDate::from_ymd_opt(2023, 1, 15).unwrap());
        assert_eq!(txn.amount, dec!(-45.23));
        assert_eq!(txn.payee, "Grocery Store");
        assert_eq!(txn.memo, "");
        assert_eq!(txn.category, "Food:Groceries");
        assert_eq!(txn.tag, "");
    }

    #[test]
    fn test_normalize_missing_payee_and_memo() {
        let mut entry = raw();
        entry.payee = None;
        entry.memo = None;
        let txn = normalize(&entry).unwrap();
        assert_eq!(txn.payee, "");
        assert_eq!(txn.memo, "");
    }

    #[test]
    fn test_normalize_trims_category_and_tag() {
        let mut entry = raw();
        entry.category = " Travel / Summer/2023 ";
        let txn = normalize(&entry).unwrap();
        assert_eq!(txn.category, "Travel");
        assert_eq!(txn.tag, "Summer/2023");
    }

    #[test]
    fn test_normalize_rejects_bad_amount() {
        let mut entry = raw();
        entry.user_amount = "twelve";
        assert_eq!(
            normalize(&entry),
            Err(RejectReason::InvalidAmount("twelve".to_string()))
        );
    }

    #[test]
    fn test_normalize_rejects_amount_without_room_for_cents() {
        let mut entry = raw();
        entry.user_amount = "9,999,999,999,999,999,999,999,999,999";
        assert_eq!(
            normalize(&entry),
            Err(RejectReason::InvalidAmount(
                "9,999,999,999,999,999,999,999,999,999".to_string()
            ))
        );
    }

    #[test]
    fn test_normalize_rejects_impossible_date() {
        let mut entry = raw();
        entry.month = "13";
        let err = normalize(&entry).unwrap_err();
        assert_eq!(err, RejectReason::InvalidDate("2023-13-15".to_string()));
        assert_eq!(err.code(), "invalid-date");
    }

    #[test]
    fn test_normalize_amount_with_commas() {
        let mut entry = raw();
        entry.user_amount = "1,234.5";
        let txn = normalize(&entry).unwrap();
        assert_eq!(txn.amount.to_string(), "1234.50");
    }

    #[test]
    fn test_map_applies_tables() {
        let mut mappings = Mappings::default();
        mappings.payee = Some(MappingTable::from_pairs([("Grocery Store", "Whole Foods")]));
        mappings.category = Some(MappingTable::from_pairs([("Food:Groceries", "Groceries")]));

        let txn = normalize(&raw()).unwrap().map(&mappings, &NoopObserver);
        assert_eq!(txn.payee, "Whole Foods");
        assert_eq!(txn.category, "Groceries");
    }

    #[test]
    fn test_into_record_import_tag() {
        let txn = normalize(&raw()).unwrap();
        let record = txn.clone().into_record("Checking", true);
        assert_eq!(record.tags, "QIFIMPORT");
        assert_eq!(record.account, "Checking");
        assert_eq!(record.original_statement, "Grocery Store");

        let mut tagged = txn.clone();
        tagged.tag = "Vacation".to_string();
        assert_eq!(tagged.into_record("Checking", true).tags, "QIFIMPORT,Vacation");

        assert_eq!(txn.into_record("Checking", false).tags, "");
    }
}
