//! Input loading.

use crate::error::ExportError;
use qifport_parser::normalize_line_endings;
use std::borrow::Cow;
use std::path::Path;

/// Read a QIF file into memory with `\n` line endings.
///
/// Bytes that are not valid UTF-8 are replaced rather than rejected; legacy
/// exports are frequently Latin-1.
pub fn read_source(path: &Path) -> Result<String, ExportError> {
    let bytes = std::fs::read(path).map_err(|source| ExportError::ReadInput {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "read input file");

    let text = String::from_utf8_lossy(&bytes);
    Ok(match normalize_line_endings(&text) {
        Cow::Owned(normalized) => normalized,
        Cow::Borrowed(unchanged) => unchanged.to_owned(),
    })
}
