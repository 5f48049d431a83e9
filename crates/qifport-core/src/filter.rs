//! Inclusive date-range admission.

use chrono::NaiveDate;
use thiserror::Error;

/// Error constructing a [`DateRange`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("end date {end} is before start date {start}")]
pub struct DateRangeError {
    /// The requested lower bound.
    pub start: NaiveDate,
    /// The requested upper bound.
    pub end: NaiveDate,
}

/// An inclusive `[start, end]` window. A missing bound is unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
}

impl DateRange {
    /// Create a range. Fails when both bounds are present and `end < start`.
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<Self, DateRangeError> {
        if let (Some(start), Some(end)) = (start, end) {
            if end < start {
                return Err(DateRangeError { start, end });
            }
        }
        Ok(Self { start, end })
    }

    /// A range that admits every date.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self {
            start: None,
            end: None,
        }
    }

    /// The lower bound, if any.
    #[must_use]
    pub const fn start(&self) -> Option<NaiveDate> {
        self.start
    }

    /// The upper bound, if any.
    #[must_use]
    pub const fn end(&self) -> Option<NaiveDate> {
        self.end
    }

    /// Whether neither bound is set.
    #[must_use]
    pub const fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Admit `date` iff it is not before `start` and not after `end`.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.map_or(true, |start| date >= start) && self.end.map_or(true, |end| date <= end)
    }
}
