//! Output file formats.
//!
//! A [`FileFormat`] opens a [`RecordWriter`] for each output file. The writer
//! emits the format's framing when opened and when finished, so every split
//! file is a complete document on its own.

use crate::error::ExportError;
use qifport_core::{BalanceRecord, Column, TransactionRecord};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::borrow::Cow;
use std::fmt::Display;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Buffered handle to one output file.
pub type Output = BufWriter<File>;

/// Writes the records of one output file.
pub trait RecordWriter<T> {
    /// Append one record.
    fn write(&mut self, record: &T) -> Result<(), ExportError>;

    /// Emit closing framing and flush.
    fn finish(self: Box<Self>) -> Result<(), ExportError>;
}

/// A file format for records of type `T`.
pub trait FileFormat<T> {
    /// File extension, without the dot.
    fn extension(&self) -> &str;

    /// Start a new file, writing its opening framing.
    fn open(&self, out: Output, path: &Path) -> Result<Box<dyn RecordWriter<T>>, ExportError>;
}

fn encode_error(path: &Path, err: &dyn Display) -> ExportError {
    ExportError::Encode {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

fn csv_error(path: &Path, err: csv::Error) -> ExportError {
    let message = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(source) => ExportError::write(path, source),
        _ => ExportError::Encode {
            path: path.to_path_buf(),
            message,
        },
    }
}

fn json_error(path: &Path, err: serde_json::Error) -> ExportError {
    if err.is_io() {
        ExportError::write(path, err.into())
    } else {
        encode_error(path, &err)
    }
}

// ============================================================================
// CSV
// ============================================================================

/// Quoted CSV with a configurable column list.
///
/// The header row is the bare column names. Every data value is quoted with
/// embedded quotes doubled. Values starting with `=`, `+`, `-`, or `@` are
/// written as-is; spreadsheet formula injection is not guarded against.
#[derive(Debug, Clone)]
pub struct CsvFormat {
    columns: Vec<Column>,
}

impl CsvFormat {
    /// Create a CSV format writing `columns` in order.
    pub const fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    fn header(&self) -> String {
        let names: Vec<&str> = self.columns.iter().map(Column::name).collect();
        format!("{}\n", names.join(","))
    }
}

impl FileFormat<TransactionRecord> for CsvFormat {
    fn extension(&self) -> &str {
        "csv"
    }

    fn open(
        &self,
        mut out: Output,
        path: &Path,
    ) -> Result<Box<dyn RecordWriter<TransactionRecord>>, ExportError> {
        out.write_all(self.header().as_bytes())
            .map_err(|e| ExportError::write(path, e))?;

        let writer = csv::WriterBuilder::new()
            .quote_style(csv::QuoteStyle::Always)
            .terminator(csv::Terminator::Any(b'\n'))
            .has_headers(false)
            .from_writer(out);

        Ok(Box::new(CsvRecordWriter {
            path: path.to_path_buf(),
            columns: self.columns.clone(),
            writer,
        }))
    }
}

struct CsvRecordWriter {
    path: PathBuf,
    columns: Vec<Column>,
    writer: csv::Writer<Output>,
}

impl RecordWriter<TransactionRecord> for CsvRecordWriter {
    fn write(&mut self, record: &TransactionRecord) -> Result<(), ExportError> {
        let fields: Vec<Cow<'_, str>> = self.columns.iter().map(|c| record.field(c)).collect();
        self.writer
            .write_record(fields.iter().map(|f| f.as_bytes()))
            .map_err(|e| csv_error(&self.path, e))
    }

    fn finish(mut self: Box<Self>) -> Result<(), ExportError> {
        self.writer
            .flush()
            .map_err(|e| ExportError::write(&self.path, e))
    }
}

// ============================================================================
// JSON
// ============================================================================

/// A pretty-printed JSON array per file.
///
/// JSON arrays cannot be appended to, so records are buffered until the file
/// is finished.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormat;

impl FileFormat<TransactionRecord> for JsonFormat {
    fn extension(&self) -> &str {
        "json"
    }

    fn open(
        &self,
        out: Output,
        path: &Path,
    ) -> Result<Box<dyn RecordWriter<TransactionRecord>>, ExportError> {
        Ok(Box::new(JsonRecordWriter {
            path: path.to_path_buf(),
            out,
            records: Vec::new(),
        }))
    }
}

struct JsonRecordWriter {
    path: PathBuf,
    out: Output,
    records: Vec<TransactionRecord>,
}

impl RecordWriter<TransactionRecord> for JsonRecordWriter {
    fn write(&mut self, record: &TransactionRecord) -> Result<(), ExportError> {
        self.records.push(record.clone());
        Ok(())
    }

    fn finish(mut self: Box<Self>) -> Result<(), ExportError> {
        serde_json::to_writer_pretty(&mut self.out, &self.records)
            .map_err(|e| json_error(&self.path, e))?;
        self.out
            .write_all(b"\n")
            .and_then(|()| self.out.flush())
            .map_err(|e| ExportError::write(&self.path, e))
    }
}

// ============================================================================
// XML
// ============================================================================

const XML_ROOT: &str = "transactions";
const XML_RECORD: &str = "transaction";

/// One `<transactions>` document per file, one `<transaction>` per record.
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlFormat;

impl FileFormat<TransactionRecord> for XmlFormat {
    fn extension(&self) -> &str {
        "xml"
    }

    fn open(
        &self,
        out: Output,
        path: &Path,
    ) -> Result<Box<dyn RecordWriter<TransactionRecord>>, ExportError> {
        let mut writer = quick_xml::Writer::new_with_indent(out, b' ', 2);
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(|e| encode_error(path, &e))?;
        writer
            .write_event(Event::Start(BytesStart::new(XML_ROOT)))
            .map_err(|e| encode_error(path, &e))?;

        Ok(Box::new(XmlRecordWriter {
            path: path.to_path_buf(),
            writer,
        }))
    }
}

struct XmlRecordWriter {
    path: PathBuf,
    writer: quick_xml::Writer<Output>,
}

const XML_FIELDS: [(&str, Column); 8] = [
    ("date", Column::Date),
    ("merchant", Column::Merchant),
    ("category", Column::Category),
    ("account", Column::Account),
    ("original_statement", Column::OriginalStatement),
    ("notes", Column::Notes),
    ("amount", Column::Amount),
    ("tags", Column::Tags),
];

impl RecordWriter<TransactionRecord> for XmlRecordWriter {
    fn write(&mut self, record: &TransactionRecord) -> Result<(), ExportError> {
        let path = &self.path;
        self.writer
            .write_event(Event::Start(BytesStart::new(XML_RECORD)))
            .map_err(|e| encode_error(path, &e))?;
        for (tag, column) in &XML_FIELDS {
            let value = record.field(column);
            self.writer
                .create_element(*tag)
                .write_text_content(BytesText::new(&value))
                .map_err(|e| encode_error(path, &e))?;
        }
        self.writer
            .write_event(Event::End(BytesEnd::new(XML_RECORD)))
            .map_err(|e| encode_error(path, &e))
    }

    fn finish(mut self: Box<Self>) -> Result<(), ExportError> {
        self.writer
            .write_event(Event::End(BytesEnd::new(XML_ROOT)))
            .map_err(|e| encode_error(&self.path, &e))?;
        let mut out = self.writer.into_inner();
        out.write_all(b"\n")
            .and_then(|()| out.flush())
            .map_err(|e| ExportError::write(&self.path, e))
    }
}

// ============================================================================
// Balance history
// ============================================================================

/// Two-column `Date,Balance` CSV.
#[derive(Debug, Clone, Copy, Default)]
pub struct BalanceCsvFormat;

impl FileFormat<BalanceRecord> for BalanceCsvFormat {
    fn extension(&self) -> &str {
        "csv"
    }

    fn open(
        &self,
        mut out: Output,
        path: &Path,
    ) -> Result<Box<dyn RecordWriter<BalanceRecord>>, ExportError> {
        out.write_all(b"Date,Balance\n")
            .map_err(|e| ExportError::write(path, e))?;
        Ok(Box::new(BalanceRecordWriter {
            path: path.to_path_buf(),
            out,
        }))
    }
}

struct BalanceRecordWriter {
    path: PathBuf,
    out: Output,
}

impl RecordWriter<BalanceRecord> for BalanceRecordWriter {
    fn write(&mut self, record: &BalanceRecord) -> Result<(), ExportError> {
        writeln!(
            self.out,
            "{},{}",
            record.date.format("%Y-%m-%d"),
            record.balance
        )
        .map_err(|e| ExportError::write(&self.path, e))
    }

    fn finish(mut self: Box<Self>) -> Result<(), ExportError> {
        self.out
            .flush()
            .map_err(|e| ExportError::write(&self.path, e))
    }
}
