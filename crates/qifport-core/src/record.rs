//! Record types produced and consumed by the pipeline.
//!
//! [`RawTransaction`] borrows its fields straight from the source text and lives
//! only while one account block is processed. [`TransactionRecord`] and
//! [`BalanceRecord`] are the terminal artifacts handed to the output writers.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// The account kinds recognized in `!Type:` declarations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountKind {
    /// `!Type:Bank`
    Bank,
    /// `!Type:CCard`
    CreditCard,
}

impl AccountKind {
    /// Parse the QIF type token following `!Type:`.
    ///
    /// Returns `None` for every kind other than `Bank` and `CCard`.
    #[must_use]
    pub fn from_qif(token: &str) -> Option<Self> {
        match token.trim() {
            "Bank" => Some(Self::Bank),
            "CCard" => Some(Self::CreditCard),
            _ => None,
        }
    }

    /// The token used for this kind in QIF files.
    #[must_use]
    pub const fn qif_name(&self) -> &'static str {
        match self {
            Self::Bank => "Bank",
            Self::CreditCard => "CCard",
        }
    }
}

impl fmt::Display for AccountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bank => write!(f, "Bank"),
            Self::CreditCard => write!(f, "Credit Card"),
        }
    }
}

/// Captured substrings for one transaction entry.
///
/// Every structural marker of the entry is represented, including the ones the
/// pipeline never reads (`amount`, `cleared`, `number`), so that field
/// boundaries stay aligned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawTransaction<'a> {
    /// One or two digit month from the `D` line.
    pub month: &'a str,
    /// One or two digit day from the `D` line.
    pub day: &'a str,
    /// Two digit year from the `D` line.
    pub year: &'a str,
    /// The `U` line. This is the value exported as the amount.
    pub user_amount: &'a str,
    /// The `T` line.
    pub amount: &'a str,
    /// The `C` (cleared status) line.
    pub cleared: &'a str,
    /// The optional `N` (check number) line.
    pub number: Option<&'a str>,
    /// The optional `P` (payee) line.
    pub payee: Option<&'a str>,
    /// The optional `M` (memo) line.
    pub memo: Option<&'a str>,
    /// The mandatory `L` (category, optionally `/tag`) line.
    pub category: &'a str,
}

/// A canonical transaction row, as exported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Transaction date, rendered `YYYY-MM-DD`.
    pub date: NaiveDate,
    /// Mapped payee.
    pub merchant: String,
    /// Mapped category.
    pub category: String,
    /// Mapped account name.
    pub account: String,
    /// The payee as it was stated (after mapping, same as `merchant`).
    pub original_statement: String,
    /// The memo line.
    pub notes: String,
    /// Amount with exactly two decimal places.
    pub amount: Decimal,
    /// Comma separated tags.
    pub tags: String,
}

impl TransactionRecord {
    /// Render the value of one output column.
    ///
    /// Unknown columns render as an empty string.
    pub fn field(&self, column: &Column) -> Cow<'_, str> {
        match column {
            Column::Date => Cow::Owned(self.date.format("%Y-%m-%d").to_string()),
            Column::Merchant => Cow::Borrowed(&self.merchant),
            Column::Category => Cow::Borrowed(&self.category),
            Column::Account => Cow::Borrowed(&self.account),
            Column::OriginalStatement => Cow::Borrowed(&self.original_statement),
            Column::Notes => Cow::Borrowed(&self.notes),
            Column::Amount => Cow::Owned(self.amount.to_string()),
            Column::Tags => Cow::Borrowed(&self.tags),
            Column::Other(_) => Cow::Borrowed(""),
        }
    }
}

/// One point of a daily balance series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceRecord {
    /// The day the balance applies to (end of day).
    pub date: NaiveDate,
    /// Balance with exactly two decimal places.
    pub balance: Decimal,
}

/// Default CSV column set, in the order budgeting tools expect.
pub const DEFAULT_COLUMNS: &str =
    "Date,Merchant,Category,Account,Original Statement,Notes,Amount,Tags";

/// A CSV output column.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Column {
    /// `Date`
    Date,
    /// `Merchant`
    Merchant,
    /// `Category`
    Category,
    /// `Account`
    Account,
    /// `Original Statement`
    OriginalStatement,
    /// `Notes`
    Notes,
    /// `Amount`
    Amount,
    /// `Tags`
    Tags,
    /// A column name with no matching field; always rendered empty.
    Other(String),
}

impl Column {
    /// Parse a single column name. Surrounding whitespace is ignored.
    #[must_use]
    pub fn parse(name: &str) -> Self {
        match name.trim() {
            "Date" => Self::Date,
            "Merchant" => Self::Merchant,
            "Category" => Self::Category,
            "Account" => Self::Account,
            "Original Statement" => Self::OriginalStatement,
            "Notes" => Self::Notes,
            "Amount" => Self::Amount,
            "Tags" => Self::Tags,
            other => Self::Other(other.to_string()),
        }
    }

    /// Parse a comma separated column list.
    #[must_use]
    pub fn parse_list(list: &str) -> Vec<Self> {
        list.split(',').map(Self::parse).collect()
    }

    /// The default column list.
    #[must_use]
    pub fn defaults() -> Vec<Self> {
        Self::parse_list(DEFAULT_COLUMNS)
    }

    /// The header name of this column.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Date => "Date",
            Self::Merchant => "Merchant",
            Self::Category => "Category",
            Self::Account => "Account",
            Self::OriginalStatement => "Original Statement",
            Self::Notes => "Notes",
            Self::Amount => "Amount",
            Self::Tags => "Tags",
            Self::Other(name) => name,
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample() -> TransactionRecord {
        TransactionRecord {
            date: NaiveDate::from_ymd_opt(2023, 1, 15).unwrap(),
            merchant: "Grocery Store".to_string(),
            category: "Food:Groceries".to_string(),
            account: "Checking Account".to_string(),
            original_statement: "Grocery Store".to_string(),
            notes: String::new(),
            amount: dec!(-45.23),
            tags: String::new(),
        }
    }

    #[test]
    fn test_account_kind_from_qif() {
        assert_eq!(AccountKind::from_qif("Bank"), Some(AccountKind::Bank));
        assert_eq!(AccountKind::from_qif("CCard "), Some(AccountKind::CreditCard));
        assert_eq!(AccountKind::from_qif("Invst"), None);
        assert_eq!(AccountKind::CreditCard.qif_name(), "CCard");
        assert_eq!(AccountKind::CreditCard.to_string(), "Credit Card");
    }

    #[test]
    fn test_default_columns() {
        let columns = Column::defaults();
        assert_eq!(columns.len(), 8);
        assert_eq!(columns[0], Column::Date);
        assert_eq!(columns[4], Column::OriginalStatement);
        assert_eq!(columns[7], Column::Tags);
    }

    #[test]
    fn test_column_parse_trims_and_keeps_unknown() {
        let columns = Column::parse_list("Date, Amount ,Memo");
        assert_eq!(
            columns,
            vec![Column::Date, Column::Amount, Column::Other("Memo".to_string())]
        );
        assert_eq!(columns[2].name(), "Memo");
    }

    #[test]
    fn test_record_field() {
        let record = sample();
        assert_eq!(record.field(&Column::Date), "2023-01-15");
        assert_eq!(record.field(&Column::Amount), "-45.23");
        assert_eq!(record.field(&Column::Merchant), "Grocery Store");
        assert_eq!(record.field(&Column::Other("Memo".to_string())), "");
    }
}
