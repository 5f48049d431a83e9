//! Daily balance reconstruction.
//!
//! Given one known balance (the anchor) and the signed transaction amounts
//! bucketed by day, produce the end-of-day balance for every day that had at
//! least one transaction.
//!
//! Two modes exist, selected by the anchor:
//!
//! - [`BalanceAnchor::Opening`]: the balance before the first day. Deltas are
//!   accumulated forward from it.
//! - [`BalanceAnchor::Current`]: the balance after the last day. The opening
//!   balance is derived as `current - sum(deltas)` and the series is then
//!   accumulated forward, so its final value equals the anchor.

use crate::amount::format_amount;
use crate::record::BalanceRecord;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::str::FromStr;
use thiserror::Error;

/// Error validating a balance anchor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnchorError {
    /// Neither an opening nor a current balance was given.
    #[error("either an opening balance or a current balance must be specified")]
    Missing,
    /// Both balances were given.
    #[error("opening balance and current balance are mutually exclusive; use only one")]
    Conflicting,
    /// The balance is not a number.
    #[error("invalid balance value '{value}': expected a number such as 2500.00")]
    Invalid {
        /// The text that failed to parse.
        value: String,
    },
}

/// A balance that exceeds the range of [`Decimal`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BalanceError {
    /// The transactions of one day, or the running balance at that day, overflowed.
    #[error("balance on {date} exceeds the representable range")]
    Overflow {
        /// The day whose total could not be represented.
        date: NaiveDate,
    },
    /// The sum of all deltas overflowed, so no opening balance can be derived.
    #[error("sum of all transactions exceeds the representable range")]
    TotalOverflow,
}

/// The single known balance used to seed reconstruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceAnchor {
    /// Balance before the first transaction day.
    Opening(Decimal),
    /// Balance at the end of the last transaction day.
    Current(Decimal),
}

impl BalanceAnchor {
    /// Build an anchor from the two optional user inputs.
    ///
    /// Exactly one must be present (blank strings count as absent) and it must
    /// parse as a decimal number.
    ///
    /// ```
    /// use qifport_core::{AnchorError, BalanceAnchor};
    /// use rust_decimal_macros::dec;
    ///
    /// assert_eq!(
    ///     BalanceAnchor::from_options(None, Some("2500.00")),
    ///     Ok(BalanceAnchor::Current(dec!(2500.00)))
    /// );
    /// assert_eq!(
    ///     BalanceAnchor::from_options(Some("1"), Some("2")),
    ///     Err(AnchorError::Conflicting)
    /// );
    /// ```
    pub fn from_options(opening: Option<&str>, current: Option<&str>) -> Result<Self, AnchorError> {
        let opening = opening.map(str::trim).filter(|s| !s.is_empty());
        let current = current.map(str::trim).filter(|s| !s.is_empty());

        match (opening, current) {
            (None, None) => Err(AnchorError::Missing),
            (Some(_), Some(_)) => Err(AnchorError::Conflicting),
            (Some(value), None) => parse_balance(value).map(Self::Opening),
            (None, Some(value)) => parse_balance(value).map(Self::Current),
        }
    }

    /// The anchor value.
    #[must_use]
    pub const fn value(&self) -> Decimal {
        match self {
            Self::Opening(value) | Self::Current(value) => *value,
        }
    }

    /// Whether the series is computed forward from an opening balance.
    #[must_use]
    pub const fn is_opening(&self) -> bool {
        matches!(self, Self::Opening(_))
    }
}

fn parse_balance(value: &str) -> Result<Decimal, AnchorError> {
    Decimal::from_str(value).map_err(|_| AnchorError::Invalid {
        value: value.to_string(),
    })
}

/// Sum of signed amounts per day, iterated in ascending date order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DailyDeltas {
    deltas: BTreeMap<NaiveDate, Decimal>,
}

impl DailyDeltas {
    /// Create an empty set of deltas.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build deltas from `(date, amount)` pairs.
    pub fn from_entries<I>(entries: I) -> Result<Self, BalanceError>
    where
        I: IntoIterator<Item = (NaiveDate, Decimal)>,
    {
        let mut deltas = Self::new();
        for (date, amount) in entries {
            deltas.add(date, amount)?;
        }
        Ok(deltas)
    }

    /// Accumulate `amount` into the bucket for `date`.
    ///
    /// On overflow the bucket is left unchanged.
    pub fn add(&mut self, date: NaiveDate, amount: Decimal) -> Result<(), BalanceError> {
        let bucket = self.deltas.entry(date).or_insert(Decimal::ZERO);
        *bucket = bucket
            .checked_add(amount)
            .ok_or(BalanceError::Overflow { date })?;
        Ok(())
    }

    /// Sum of every bucket.
    pub fn total(&self) -> Result<Decimal, BalanceError> {
        self.deltas
            .values()
            .try_fold(Decimal::ZERO, |sum, delta| sum.checked_add(*delta))
            .ok_or(BalanceError::TotalOverflow)
    }

    /// The delta for one day, if it had transactions.
    #[must_use]
    pub fn get(&self, date: NaiveDate) -> Option<Decimal> {
        self.deltas.get(&date).copied()
    }

    /// `(date, delta)` pairs in ascending date order.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, Decimal)> + '_ {
        self.deltas.iter().map(|(date, delta)| (*date, *delta))
    }

    /// Number of distinct days.
    #[must_use]
    pub fn len(&self) -> usize {
        self.deltas.len()
    }

    /// Whether no day has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.deltas.is_empty()
    }
}

/// Produce the end-of-day balance series, one record per day with deltas.
///
/// Fails when a running balance leaves the range of [`Decimal`] or can no
/// longer carry two decimal digits.
pub fn reconstruct(
    deltas: &DailyDeltas,
    anchor: BalanceAnchor,
) -> Result<Vec<BalanceRecord>, BalanceError> {
    let mut running = match anchor {
        BalanceAnchor::Opening(opening) => opening,
        BalanceAnchor::Current(current) => current
            .checked_sub(deltas.total()?)
            .ok_or(BalanceError::TotalOverflow)?,
    };

    deltas
        .iter()
        .map(|(date, delta)| {
            running = running
                .checked_add(delta)
                .ok_or(BalanceError::Overflow { date })?;
            let balance = format_amount(running).ok_or(BalanceError::Overflow { date })?;
            Ok(BalanceRecord { date, balance })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 1, d).unwrap()
    }

    #[test]
    fn test_anchor_validation() {
        assert_eq!(BalanceAnchor::from_options(None, None), Err(AnchorError::Missing));
        assert_eq!(
            BalanceAnchor::from_options(Some(""), Some("  ")),
            Err(AnchorError::Missing)
        );
        assert_eq!(
            BalanceAnchor::from_options(Some("10"), Some("20")),
            Err(AnchorError::Conflicting)
        );
        assert_eq!(
            BalanceAnchor::from_options(Some("ten"), None),
            Err(AnchorError::Invalid {
                value: "ten".to_string()
            })
        );
        assert_eq!(
            BalanceAnchor::from_options(Some("-12.5"), None),
            Ok(BalanceAnchor::Opening(dec!(-12.5)))
        );
    }

    #[test]
    fn test_deltas_accumulate_per_day() {
        let mut deltas = DailyDeltas::new();
        deltas.add(date(2), dec!(-10.00)).unwrap();
        deltas.add(date(1), dec!(5.00)).unwrap();
        deltas.add(date(2), dec!(-2.50)).unwrap();

        assert_eq!(deltas.len(), 2);
        assert_eq!(deltas.get(date(2)), Some(dec!(-12.50)));
        assert_eq!(deltas.total(), Ok(dec!(-7.50)));
        let days: Vec<_> = deltas.iter().map(|(d, _)| d).collect();
        assert_eq!(days, vec![date(1), date(2)]);
    }

    #[test]
    fn test_backward_mode_ends_at_current_balance() {
        let deltas =
            DailyDeltas::from_entries([(date(10), dec!(-45.23)), (date(12), dec!(-35.50))])
                .unwrap();

        let series = reconstruct(&deltas, BalanceAnchor::Current(dec!(2500.00))).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].date, date(10));
        assert_eq!(series[0].balance.to_string(), "2535.50");
        assert_eq!(series[1].date, date(12));
        assert_eq!(series[1].balance.to_string(), "2500.00");
    }

    #[test]
    fn test_forward_mode() {
        let deltas = DailyDeltas::from_entries([(date(1), dec!(100)), (date(3), dec!(-25.5))])
            .unwrap();

        let series = reconstruct(&deltas, BalanceAnchor::Opening(dec!(1000))).unwrap();
        let balances: Vec<String> = series.iter().map(|r| r.balance.to_string()).collect();
        assert_eq!(balances, vec!["1100.00", "1074.50"]);
    }

    #[test]
    fn test_empty_deltas_produce_empty_series() {
        let series = reconstruct(&DailyDeltas::new(), BalanceAnchor::Current(dec!(1))).unwrap();
        assert!(series.is_empty());
    }

    #[test]
    fn test_same_day_overflow_is_an_error() {
        let big = dec!(9000000000000000000000000000);
        let mut deltas = DailyDeltas::new();
        for _ in 0..8 {
            deltas.add(date(1), big).unwrap();
        }
        assert_eq!(
            deltas.add(date(1), big),
            Err(BalanceError::Overflow { date: date(1) })
        );
        assert_eq!(deltas.get(date(1)), Some(big * dec!(8)));
    }

    #[test]
    fn test_total_overflow_is_an_error() {
        let big = dec!(60000000000000000000000000000);
        let deltas = DailyDeltas::from_entries([(date(1), big), (date(2), big)]).unwrap();

        assert_eq!(deltas.total(), Err(BalanceError::TotalOverflow));
        assert_eq!(
            reconstruct(&deltas, BalanceAnchor::Current(dec!(0))),
            Err(BalanceError::TotalOverflow)
        );
    }

    #[test]
    fn test_running_balance_overflow_is_an_error() {
        let big = dec!(60000000000000000000000000000);
        let deltas = DailyDeltas::from_entries([(date(1), big)]).unwrap();

        assert_eq!(
            reconstruct(&deltas, BalanceAnchor::Opening(big)),
            Err(BalanceError::Overflow { date: date(1) })
        );
    }

    #[test]
    fn test_balance_without_room_for_cents_is_an_error() {
        let deltas =
            DailyDeltas::from_entries([(date(3), dec!(9999999999999999999999999999))]).unwrap();

        assert_eq!(
            reconstruct(&deltas, BalanceAnchor::Opening(dec!(0))),
            Err(BalanceError::Overflow { date: date(3) })
        );
    }
}
