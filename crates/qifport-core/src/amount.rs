//! Amount parsing and two-decimal rendering.

use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// Parse a QIF amount, stripping thousands separators first.
///
/// Returns `None` when the remaining text is not a plain decimal number.
/// Digit-group underscores are not accepted.
///
/// # Examples
///
/// ```
/// use qifport_core::parse_amount;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(parse_amount("-1,234.56"), Some(dec!(-1234.56)));
/// assert_eq!(parse_amount(" 12 "), Some(dec!(12)));
/// assert_eq!(parse_amount("N/A"), None);
/// ```
pub fn parse_amount(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() || cleaned.contains('_') {
        return None;
    }
    Decimal::from_str(&cleaned).ok()
}

/// Round to cents and pin the scale to two, so the value always renders with
/// exactly two decimal digits.
///
/// Midpoints round away from zero. A result of zero is never negative.
/// Returns `None` when the value is too large to carry two decimal digits.
///
/// ```
/// use qifport_core::format_amount;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(format_amount(dec!(5)).map(|a| a.to_string()), Some("5.00".to_string()));
/// assert_eq!(format_amount(dec!(9999999999999999999999999999)), None);
/// ```
#[must_use]
pub fn format_amount(value: Decimal) -> Option<Decimal> {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    if rounded.is_zero() {
        return Some(Decimal::new(0, 2));
    }
    rounded.rescale(2);
    (rounded.scale() == 2).then_some(rounded)
}
