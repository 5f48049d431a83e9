//! Record-count-bounded file splitting.

use crate::error::ExportError;
use crate::format::{FileFormat, RecordWriter};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Spreads a record stream over numbered files of at most `cap` records.
///
/// Files are named `{stem}_{n}.{ext}` with `n` starting at 1 and are opened
/// lazily, so a stream whose length is an exact multiple of the cap never
/// leaves a trailing empty file. A stream with no records still produces one
/// file carrying only the format's framing.
pub struct Batcher<'f, T> {
    format: &'f dyn FileFormat<T>,
    dir: PathBuf,
    stem: String,
    cap: usize,
    current: Option<Box<dyn RecordWriter<T>>>,
    in_file: usize,
    records: usize,
    files: Vec<PathBuf>,
}

impl<'f, T> Batcher<'f, T> {
    /// Create a batcher writing into `dir`. A `cap` of `0` never splits.
    pub fn new(
        format: &'f dyn FileFormat<T>,
        dir: &Path,
        stem: impl Into<String>,
        cap: usize,
    ) -> Self {
        Self {
            format,
            dir: dir.to_path_buf(),
            stem: stem.into(),
            cap,
            current: None,
            in_file: 0,
            records: 0,
            files: Vec::new(),
        }
    }

    /// Append one record, opening a new file if needed.
    pub fn push(&mut self, record: &T) -> Result<(), ExportError> {
        if self.current.is_none() {
            let writer = self.open_next()?;
            self.current = Some(writer);
        }
        if let Some(writer) = self.current.as_mut() {
            writer.write(record)?;
        }

        self.in_file += 1;
        self.records += 1;
        if self.cap != 0 && self.in_file == self.cap {
            self.close_current()?;
        }
        Ok(())
    }

    /// Close the open file and return every path written, in order.
    pub fn finish(mut self) -> Result<Vec<PathBuf>, ExportError> {
        if self.files.is_empty() {
            self.current = Some(self.open_next()?);
        }
        self.close_current()?;
        Ok(self.files)
    }

    /// Records pushed so far.
    pub const fn records(&self) -> usize {
        self.records
    }

    fn open_next(&mut self) -> Result<Box<dyn RecordWriter<T>>, ExportError> {
        let index = self.files.len() + 1;
        let path = self
            .dir
            .join(format!("{}_{index}.{}", self.stem, self.format.extension()));

        if path.exists() {
            tracing::warn!(path = %path.display(), "overwriting existing file");
        }
        let file = File::create(&path).map_err(|source| ExportError::CreateFile {
            path: path.clone(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "opened output file");

        let writer = self.format.open(BufWriter::new(file), &path)?;
        self.files.push(path);
        self.in_file = 0;
        Ok(writer)
    }

    fn close_current(&mut self) -> Result<(), ExportError> {
        if let Some(writer) = self.current.take() {
            writer.finish()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::BalanceCsvFormat;
    use chrono::{Days, NaiveDate};
    use qifport_core::BalanceRecord;
    use rust_decimal::Decimal;

    fn records(n: u64) -> Vec<BalanceRecord> {
        let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        (0..n)
            .map(|i| BalanceRecord {
                date: start + Days::new(i),
                balance: Decimal::new(i as i64 * 100, 2),
            })
            .collect()
    }

    fn run(n: u64, cap: usize) -> (tempfile::TempDir, Vec<PathBuf>) {
        let dir = tempfile::tempdir().unwrap();
        let mut batcher = Batcher::<BalanceRecord>::new(
            &BalanceCsvFormat,
            dir.path(),
            "Checking_balance_history",
            cap,
        );
        for record in records(n) {
            batcher.push(&record).unwrap();
        }
        assert_eq!(batcher.records(), n as usize);
        let files = batcher.finish().unwrap();
        (dir, files)
    }

    fn line_count(path: &Path) -> usize {
        std::fs::read_to_string(path).unwrap().lines().count()
    }

    #[test]
    fn test_split_sizes() {
        let (_dir, files) = run(7, 3);
        assert_eq!(files.len(), 3);
        let sizes: Vec<usize> = files.iter().map(|f| line_count(f) - 1).collect();
        assert_eq!(sizes, vec![3, 3, 1]);
        assert!(files[2].ends_with("Checking_balance_history_3.csv"));
    }

    #[test]
    fn test_exact_multiple_leaves_no_empty_file() {
        let (dir, files) = run(6, 3);
        assert_eq!(files.len(), 2);
        assert!(!dir.path().join("Checking_balance_history_3.csv").exists());
    }

    #[test]
    fn test_empty_stream_writes_header_only_file() {
        let (_dir, files) = run(0, 3);
        assert_eq!(files.len(), 1);
        assert_eq!(std::fs::read_to_string(&files[0]).unwrap(), "Date,Balance\n");
    }

    #[test]
    fn test_zero_cap_never_splits() {
        let (_dir, files) = run(25, 0);
        assert_eq!(files.len(), 1);
        assert_eq!(line_count(&files[0]), 26);
    }

    #[test]
    fn test_every_file_repeats_header() {
        let (_dir, files) = run(4, 2);
        for file in &files {
            let text = std::fs::read_to_string(file).unwrap();
            assert!(text.starts_with("Date,Balance\n"));
        }
    }

    #[test]
    fn test_missing_directory_fails_on_create() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let mut batcher = Batcher::<BalanceRecord>::new(&BalanceCsvFormat, &missing, "x", 10);
        let err = batcher.push(&records(1)[0]).unwrap_err();
        assert!(matches!(err, ExportError::CreateFile { .. }));
    }
}
