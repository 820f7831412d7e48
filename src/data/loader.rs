//! Semicolon-delimited dataset reader.

use crate::error::{Result, StressError};
use std::io::Read;
use std::path::Path;

/// Text cells exactly as read from the dataset file.
///
/// Short rows are padded with empty cells; extra trailing cells are dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Builds a table from headers and rows.
    ///
    /// # Errors
    ///
    /// Returns an error if there are no headers or a header is duplicated.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self> {
        if headers.is_empty() {
            return Err(StressError::empty_input("dataset header"));
        }
        let mut sorted: Vec<&str> = headers.iter().map(String::as_str).collect();
        sorted.sort_unstable();
        if let Some(dup) = sorted.windows(2).find(|w| w[0] == w[1]) {
            return Err(StressError::Csv(format!("duplicate column '{}'", dup[0])));
        }

        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();
        Ok(Self { headers, rows })
    }

    /// Reads the dataset file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`StressError::DatasetNotFound`] if the file does not exist,
    /// or a CSV error if it cannot be parsed.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(StressError::DatasetNotFound {
                path: path.to_path_buf(),
            });
        }
        let file = std::fs::File::open(path)?;
        let table = Self::from_reader(std::io::BufReader::new(file))?;
        tracing::debug!(path = %path.display(), rows = table.n_rows(), "dataset loaded");
        Ok(table)
    }

    /// Reads a semicolon-delimited table from any reader.
    ///
    /// # Errors
    ///
    /// Returns an error if the header or a record cannot be parsed.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b';')
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            if record.iter().all(str::is_empty) {
                continue;
            }
            rows.push(record.iter().map(str::to_string).collect());
        }

        Self::new(headers, rows)
    }

    /// Returns the column headers in file order.
    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Returns the number of data rows.
    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// Whether a column with this header exists.
    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.headers.iter().any(|h| h == name)
    }

    /// Returns a column's cells; empty cells are `None`.
    ///
    /// # Errors
    ///
    /// Returns [`StressError::MissingColumn`] if the header is absent.
    pub fn column(&self, name: &str) -> Result<Vec<Option<&str>>> {
        let idx = self
            .headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| StressError::missing_column(name))?;

        Ok(self
            .rows
            .iter()
            .map(|row| {
                let cell = row[idx].as_str();
                (!cell.is_empty()).then_some(cell)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "Gender;Umur;IPK;Label\n\
                          Perempuan;20;3,5;Sehat\n\
                          Laki-laki;22;0.188194444;Risiko Stres\n";

    #[test]
    fn test_from_reader_semicolon() {
        let table = RawTable::from_reader(SAMPLE.as_bytes()).expect("parse should succeed");
        assert_eq!(table.headers(), &["Gender", "Umur", "IPK", "Label"]);
        assert_eq!(table.n_rows(), 2);
        let ipk = table.column("IPK").expect("IPK exists");
        assert_eq!(ipk, vec![Some("3,5"), Some("0.188194444")]);
    }

    #[test]
    fn test_short_rows_are_padded_with_missing() {
        let text = "A;B;C\n1;2\n";
        let table = RawTable::from_reader(text.as_bytes()).expect("parse should succeed");
        assert_eq!(table.column("C").expect("C exists"), vec![None]);
    }

    #[test]
    fn test_blank_lines_skipped() {
        let text = "A;B\n1;2\n;\n3;4\n";
        let table = RawTable::from_reader(text.as_bytes()).expect("parse should succeed");
        assert_eq!(table.n_rows(), 2);
    }

    #[test]
    fn test_missing_column_error() {
        let table = RawTable::from_reader(SAMPLE.as_bytes()).expect("parse should succeed");
        let err = table.column("Jurusan/Program Studi").unwrap_err();
        assert!(matches!(err, StressError::MissingColumn { .. }));
    }

    #[test]
    fn test_duplicate_header_rejected() {
        let err = RawTable::new(vec!["A".into(), "A".into()], vec![]).unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn test_from_path_missing_file() {
        let err = RawTable::from_path("/definitely/not/here.csv").unwrap_err();
        assert!(matches!(err, StressError::DatasetNotFound { .. }));
    }

    #[test]
    fn test_from_path_reads_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("dataset.csv");
        std::fs::write(&path, SAMPLE).expect("write dataset");
        let table = RawTable::from_path(&path).expect("load should succeed");
        assert_eq!(table.n_rows(), 2);
    }
}
