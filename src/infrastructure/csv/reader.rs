// ============================================================
// CSV READER
// ============================================================
// Parse dashboard exports: header row first, every data row must
// match the header width

use std::fs;
use std::path::Path;

use csv::ReaderBuilder;
use encoding_rs::WINDOWS_1252;

use crate::domain::error::{AppError, Result};

/// Parsed CSV contents: one header row plus zero or more data rows,
/// all guaranteed to have the header's width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// CSV reader for dashboard exports.
pub struct CsvReader {
    /// Delimiter character (default: comma)
    delimiter: u8,
}

impl Default for CsvReader {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl CsvReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set custom delimiter
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Read and parse a CSV file.
    pub fn read_file(&self, path: &Path) -> Result<CsvTable> {
        let raw = fs::read(path)
            .map_err(|e| AppError::Io(format!("failed to read {}: {}", path.display(), e)))?;
        self.read_content(&decode(&raw))
    }

    /// Parse CSV content from a string.
    ///
    /// A row whose cell count differs from the header is a `Format`
    /// error; rows are never padded or truncated.
    pub fn read_content(&self, content: &str) -> Result<CsvTable> {
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .flexible(false)
            .from_reader(content.as_bytes());

        let header: Vec<String> = reader
            .headers()
            .map_err(|e| AppError::Format(format!("failed to read CSV header: {}", e)))?
            .iter()
            .map(str::to_string)
            .collect();

        if header.is_empty() || header.iter().all(|name| name.trim().is_empty()) {
            return Err(AppError::Format(
                "CSV header row is missing or empty".to_string(),
            ));
        }

        let mut rows = Vec::new();
        for (index, result) in reader.records().enumerate() {
            let record = result.map_err(|e| {
                AppError::Format(format!("failed to parse CSV row {}: {}", index + 1, e))
            })?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        Ok(CsvTable { header, rows })
    }
}

/// UTF-8 with a Windows-1252 fallback. Exports from older dashboards
/// occasionally arrive in the latter.
fn decode(raw: &[u8]) -> String {
    match std::str::from_utf8(raw) {
        Ok(content) => content.to_string(),
        Err(_) => {
            let (content, _, _) = WINDOWS_1252.decode(raw);
            content.into_owned()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_header_and_rows() {
        let table = CsvReader::new()
            .read_content("name,age\nAlice,30\nBob,25\n")
            .unwrap();
        assert_eq!(table.header, vec!["name", "age"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0], vec!["Alice", "30"]);
    }

    #[test]
    fn header_only_yields_no_rows() {
        let table = CsvReader::new().read_content("name,age\n").unwrap();
        assert_eq!(table.header.len(), 2);
        assert!(table.rows.is_empty());
    }

    #[test]
    fn trailing_empty_cell_is_preserved() {
        let table = CsvReader::new()
            .read_content("a,b,c\n1,2,\n")
            .unwrap();
        assert_eq!(table.rows[0], vec!["1", "2", ""]);
    }

    #[test]
    fn ragged_row_is_a_format_error() {
        let err = CsvReader::new()
            .read_content("a,b,c\n1,2\n")
            .unwrap_err();
        match err {
            AppError::Format(msg) => assert!(msg.contains("row 1"), "{}", msg),
            other => panic!("expected Format error, got {:?}", other),
        }
    }

    #[test]
    fn extra_cell_is_a_format_error() {
        let err = CsvReader::new()
            .read_content("a,b\n1,2,3\n")
            .unwrap_err();
        assert!(matches!(err, AppError::Format(_)));
    }

    #[test]
    fn empty_input_is_a_missing_header() {
        let err = CsvReader::new().read_content("").unwrap_err();
        assert!(matches!(err, AppError::Format(_)));
    }

    #[test]
    fn quoted_fields_with_commas() {
        let table = CsvReader::new()
            .read_content("name,notes\nAlice,\"late, no dinner\"\n")
            .unwrap();
        assert_eq!(table.rows[0][1], "late, no dinner");
    }

    #[test]
    fn custom_delimiter() {
        let table = CsvReader::new()
            .with_delimiter(b';')
            .read_content("a;b\n1;2\n")
            .unwrap();
        assert_eq!(table.rows[0], vec!["1", "2"]);
    }

    #[test]
    fn windows_1252_bytes_are_decoded() {
        // "Café" with an 0xE9 e-acute, not valid UTF-8.
        assert_eq!(decode(&[b'C', b'a', b'f', 0xE9]), "Café");
    }
}
