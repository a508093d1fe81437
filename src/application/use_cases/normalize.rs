// ============================================================
// RECORD NORMALIZER USE CASE
// ============================================================
// CSV export -> JSON array of reservation records

use std::fs;
use std::path::Path;

use tracing::info;

use crate::domain::error::{AppError, Result};
use crate::domain::reservation::ReservationRecord;
use crate::infrastructure::csv::{CsvReader, CsvTable};

/// Converts a dashboard CSV export into reservation records and writes
/// them out as a JSON array.
///
/// A pure single-pass transform: the header row fixes the key set and
/// order, each data row is zipped positionally against it, and empty
/// cells become nulls. No type inference — dates and amounts stay
/// strings.
pub struct RecordNormalizer {
    reader: CsvReader,
    columns: Option<Vec<String>>,
}

impl Default for RecordNormalizer {
    fn default() -> Self {
        Self {
            reader: CsvReader::new(),
            columns: None,
        }
    }
}

impl RecordNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reader(mut self, reader: CsvReader) -> Self {
        self.reader = reader;
        self
    }

    /// Keep only the listed columns, in list order. Without a
    /// selection every header column is kept.
    pub fn with_columns(mut self, columns: Vec<String>) -> Self {
        self.columns = Some(columns);
        self
    }

    /// Read `csv_path` and convert every data row into a record.
    pub fn normalize_file(&self, csv_path: &Path) -> Result<Vec<ReservationRecord>> {
        if !csv_path.exists() {
            return Err(AppError::Io(format!(
                "input CSV not found: {}",
                csv_path.display()
            )));
        }
        let table = self.reader.read_file(csv_path)?;
        self.normalize_table(&table)
    }

    /// In-memory variant of [`normalize_file`](Self::normalize_file).
    pub fn normalize_content(&self, content: &str) -> Result<Vec<ReservationRecord>> {
        let table = self.reader.read_content(content)?;
        self.normalize_table(&table)
    }

    fn normalize_table(&self, table: &CsvTable) -> Result<Vec<ReservationRecord>> {
        let selection = self.validated_selection(&table.header)?;

        let mut records = Vec::with_capacity(table.rows.len());
        for row in &table.rows {
            // The reader rejects ragged rows, so the zip is total.
            let record = ReservationRecord::from_cells(&table.header, row);
            records.push(match &selection {
                Some(columns) => record.select(columns),
                None => record,
            });
        }
        Ok(records)
    }

    fn validated_selection(&self, header: &[String]) -> Result<Option<&[String]>> {
        let Some(columns) = self.columns.as_deref() else {
            return Ok(None);
        };
        for column in columns {
            if !header.iter().any(|name| name == column) {
                return Err(AppError::Validation(format!(
                    "selected column {:?} is not in the CSV header",
                    column
                )));
            }
        }
        Ok(Some(columns))
    }

    /// Serialize `records` and write them to `out_path` in one shot.
    ///
    /// The document is built fully in memory first, so a failed run
    /// never leaves a partial output file behind.
    pub fn write_json(&self, records: &[ReservationRecord], out_path: &Path) -> Result<()> {
        let json = serde_json::to_vec_pretty(records)
            .map_err(|e| AppError::Format(format!("failed to serialize records: {}", e)))?;
        if let Some(parent) = out_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(out_path, json)?;
        Ok(())
    }

    /// Full pass: read, normalize, write. Returns the record count.
    pub fn run(&self, csv_path: &Path, out_path: &Path) -> Result<usize> {
        let records = self.normalize_file(csv_path)?;
        self.write_json(&records, out_path)?;
        info!(
            records = records.len(),
            output = %out_path.display(),
            "wrote reservations JSON"
        );
        Ok(records.len())
    }
}
