//! Observation hooks invoked alongside the pure pipeline stages.
//!
//! The transformation stages never count or log anything themselves. They call
//! an [`Observer`] instead, so they stay testable without a metrics sink.

use crate::mapping::MappingKind;
use crate::normalize::RejectReason;
use crate::record::TransactionRecord;

/// Receives validation events during a run.
///
/// Every method has an empty default body. Implementations may be shared
/// between producers, hence the `Send + Sync` bound and `&self` receivers.
pub trait Observer: Send + Sync {
    /// A record passed every stage and will be written.
    fn transaction_admitted(&self, _record: &TransactionRecord) {}

    /// A record was dropped by the date-range filter.
    fn transaction_filtered(&self, _record: &TransactionRecord) {}

    /// A transaction in `account` could not be normalized.
    fn transaction_rejected(&self, _account: &str, _reason: &RejectReason) {}

    /// `source` matched an entry of the `kind` table.
    fn mapping_hit(&self, _kind: MappingKind, _source: &str) {}

    /// `value` was looked up in the `kind` table without a match.
    fn mapping_miss(&self, _kind: MappingKind, _value: &str) {}
}

/// An observer that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl Observer for NoopObserver {}
