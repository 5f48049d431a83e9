//! Mapping file loading.
//!
//! A mapping file is headerless CSV with `source,target` rows. One-column rows
//! are skipped silently, rows with more than two columns are reported and
//! skipped, and rows with an empty target are dropped.

use crate::error::ExportError;
use qifport_core::{MappingKind, MappingTable, Mappings};
use std::io::Read;
use std::path::{Path, PathBuf};

/// Optional mapping file paths, one per mapping kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingFiles {
    /// Account name mapping file.
    pub account: Option<PathBuf>,
    /// Category mapping file.
    pub category: Option<PathBuf>,
    /// Payee mapping file.
    pub payee: Option<PathBuf>,
    /// Tag mapping file.
    pub tag: Option<PathBuf>,
}

impl MappingFiles {
    fn path(&self, kind: MappingKind) -> Option<&Path> {
        match kind {
            MappingKind::Account => self.account.as_deref(),
            MappingKind::Category => self.category.as_deref(),
            MappingKind::Payee => self.payee.as_deref(),
            MappingKind::Tag => self.tag.as_deref(),
        }
    }

    /// Load every configured file. Kinds without a file get no table.
    pub fn load(&self) -> Result<Mappings, ExportError> {
        let mut mappings = Mappings::default();
        for kind in MappingKind::ALL {
            if let Some(path) = self.path(kind) {
                let table = load_mapping_file(path)?;
                tracing::debug!(
                    kind = %kind,
                    path = %path.display(),
                    entries = table.len(),
                    "loaded mapping file"
                );
                mappings.set(kind, table);
            }
        }
        Ok(mappings)
    }
}

/// Load one mapping file.
pub fn load_mapping_file(path: &Path) -> Result<MappingTable, ExportError> {
    let file = std::fs::File::open(path).map_err(|e| ExportError::MappingFile {
        path: path.to_path_buf(),
        source: e.into(),
    })?;
    read_mapping(file, path)
}

/// Parse mapping rows from any reader. `origin` is used in diagnostics.
pub fn read_mapping<R: Read>(reader: R, origin: &Path) -> Result<MappingTable, ExportError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut table = MappingTable::new();
    for result in reader.records() {
        let record = result.map_err(|source| ExportError::MappingFile {
            path: origin.to_path_buf(),
            source,
        })?;

        match record.len() {
            2 => {
                if !table.insert(&record[0], &record[1]) {
                    tracing::debug!(source = &record[0], "dropping mapping row with empty target");
                }
            }
            0 | 1 => {}
            fields => {
                let line = record.position().map_or(0, csv::Position::line);
                tracing::warn!(
                    path = %origin.display(),
                    line,
                    fields,
                    "skipping mapping row: expected 2 fields"
                );
            }
        }
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> MappingTable {
        read_mapping(text.as_bytes(), Path::new("test.csv")).unwrap()
    }

    #[test]
    fn test_two_column_rows() {
        let table = parse("AMZN Mktp,Amazon\nSBUX 123,Starbucks\n");
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("AMZN Mktp"), Some("Amazon"));
    }

    #[test]
    fn test_malformed_rows_are_skipped() {
        let table = parse("lonely\na,b,c\nGood,Row\n");
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("Good"), Some("Row"));
        assert_eq!(table.get("a"), None);
    }

    #[test]
    fn test_empty_target_is_dropped() {
        let table = parse("Known,\nOther,Target\n");
        assert_eq!(table.get("Known"), None);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_later_rows_win() {
        let table = parse("Cafe,Coffee\nCafe,Dining\n");
        assert_eq!(table.get("Cafe"), Some("Dining"));
    }

    #[test]
    fn test_quoted_fields() {
        let table = parse("\"Smith, John\",John Smith\n");
        assert_eq!(table.get("Smith, John"), Some("John Smith"));
    }

    #[test]
    fn test_missing_file() {
        let err = load_mapping_file(Path::new("/nonexistent/qifport/map.csv")).unwrap_err();
        assert!(err.to_string().contains("failed to read mapping file"));
        assert_eq!(err.io_kind(), Some(std::io::ErrorKind::NotFound));
    }
}
