//! Row sources.
//!
//! The aggregator is fed by an external collaborator that yields raw rows:
//! one `Vec<Option<String>>` per logical row, positionally aligned with the
//! schema's input fields, where `None` is a database NULL. The [`RowSource`]
//! trait is the seam; [`JsonRowSource`] reads rows from a JSON file (an
//! array of arrays of `string | null`) and is what the CLI uses in place of
//! a live query executor.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::SourceResult;

/// One raw row: nullable text cells in input-field order.
pub type RawRow = Vec<Option<String>>;

/// A source of raw rows for one feed.
pub trait RowSource {
    /// Read all rows, in the source's own order.
    fn read_rows(&mut self) -> SourceResult<Vec<RawRow>>;
}

/// Row source backed by a JSON file: `[["A", "desc", null], ...]`.
#[derive(Debug, Clone)]
pub struct JsonRowSource {
    path: PathBuf,
}

impl JsonRowSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RowSource for JsonRowSource {
    fn read_rows(&mut self) -> SourceResult<Vec<RawRow>> {
        let content = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// In-memory row source, used by tests and library callers that already
/// hold their rows.
#[derive(Debug, Clone)]
pub struct VecRowSource {
    rows: Vec<RawRow>,
}

impl VecRowSource {
    pub fn new(rows: Vec<RawRow>) -> Self {
        Self { rows }
    }
}

impl RowSource for VecRowSource {
    fn read_rows(&mut self) -> SourceResult<Vec<RawRow>> {
        Ok(std::mem::take(&mut self.rows))
    }
}

/// Build the CLI's row source for a feed's configured rows file.
///
/// Relative paths resolve against the config file's directory.
pub fn feed_row_source(config_dir: &Path, rows: &Path) -> JsonRowSource {
    if rows.is_absolute() {
        JsonRowSource::new(rows)
    } else {
        JsonRowSource::new(config_dir.join(rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_json_rows_with_nulls() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[["A", "desc", null], ["B", null, "CODE"]]"#).unwrap();

        let mut source = JsonRowSource::new(file.path());
        let rows = source.read_rows().unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][0].as_deref(), Some("A"));
        assert_eq!(rows[0][2], None);
        assert_eq!(rows[1][1], None);
    }

    #[test]
    fn test_invalid_rows_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"not": "rows"}}"#).unwrap();

        let mut source = JsonRowSource::new(file.path());
        assert!(source.read_rows().is_err());
    }

    #[test]
    fn test_vec_source() {
        let mut source = VecRowSource::new(vec![vec![Some("A".into())]]);
        let rows = source.read_rows().unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_relative_rows_path_joins_config_dir() {
        let source = feed_row_source(Path::new("/etc/feedcsv"), Path::new("rows/staff.json"));
        assert_eq!(source.path, PathBuf::from("/etc/feedcsv/rows/staff.json"));
    }
}
