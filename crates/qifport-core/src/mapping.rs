//! Rename tables applied to extracted values.

use crate::observer::Observer;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Which value a mapping table renames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MappingKind {
    /// Account names.
    Account,
    /// Categories (the part of `L` before the first `/`).
    Category,
    /// Payees.
    Payee,
    /// Tags (the part of `L` after the first `/`).
    Tag,
}

impl MappingKind {
    /// All kinds, in reporting order.
    pub const ALL: [Self; 4] = [Self::Account, Self::Category, Self::Payee, Self::Tag];

    /// Lowercase name used in reports.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Account => "account",
            Self::Category => "category",
            Self::Payee => "payee",
            Self::Tag => "tag",
        }
    }
}

impl fmt::Display for MappingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A source to target substitution table.
///
/// Keys are unique and matched exactly (case sensitive). Entries whose target
/// is empty are never stored, so a known value is never mapped to blank.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingTable {
    entries: BTreeMap<String, String>,
}

impl MappingTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from `(source, target)` pairs. Later pairs win.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut table = Self::new();
        for (source, target) in pairs {
            table.insert(source, target);
        }
        table
    }

    /// Insert an entry, overwriting an existing one with the same source.
    ///
    /// Returns `false` (and stores nothing) when `target` is empty.
    pub fn insert(&mut self, source: impl Into<String>, target: impl Into<String>) -> bool {
        let target = target.into();
        if target.is_empty() {
            return false;
        }
        self.entries.insert(source.into(), target);
        true
    }

    /// Look up the target for `source`.
    pub fn get(&self, source: &str) -> Option<&str> {
        self.entries.get(source).map(String::as_str)
    }

    /// Iterate source keys in sorted order.
    pub fn sources(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Iterate `(source, target)` entries in sorted source order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The set of optional tables used by one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mappings {
    /// Account name table.
    pub account: Option<MappingTable>,
    /// Category table.
    pub category: Option<MappingTable>,
    /// Payee table.
    pub payee: Option<MappingTable>,
    /// Tag table.
    pub tag: Option<MappingTable>,
}

impl Mappings {
    /// The table for `kind`, if one was loaded.
    pub const fn table(&self, kind: MappingKind) -> Option<&MappingTable> {
        match kind {
            MappingKind::Account => self.account.as_ref(),
            MappingKind::Category => self.category.as_ref(),
            MappingKind::Payee => self.payee.as_ref(),
            MappingKind::Tag => self.tag.as_ref(),
        }
    }

    /// Replace the table for `kind`.
    pub fn set(&mut self, kind: MappingKind, table: MappingTable) {
        let slot = match kind {
            MappingKind::Account => &mut self.account,
            MappingKind::Category => &mut self.category,
            MappingKind::Payee => &mut self.payee,
            MappingKind::Tag => &mut self.tag,
        };
        *slot = Some(table);
    }

    /// Map `value` through the table for `kind`.
    ///
    /// Values without an entry are returned unchanged. Hits and misses against
    /// a loaded table are reported to `observer`; empty values and kinds with
    /// no table are not reported.
    pub fn apply(&self, kind: MappingKind, value: &str, observer: &dyn Observer) -> String {
        let Some(table) = self.table(kind) else {
            return value.to_string();
        };
        if value.is_empty() {
            return String::new();
        }

        match table.get(value) {
            Some(target) => {
                observer.mapping_hit(kind, value);
                target.to_string()
            }
            None => {
                observer.mapping_miss(kind, value);
                value.to_string()
            }
        }
    }
}
