// ============================================================
// EXPORT RESERVATIONS USE CASE
// ============================================================
// One full run: authenticate, filter, download, normalize, write JSON

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::info;

use crate::domain::date_range::DateRange;
use crate::domain::error::Result;
use crate::infrastructure::browser::SessionDriver;

use super::normalize::RecordNormalizer;

/// What a completed run produced.
#[derive(Debug)]
pub struct ExportSummary {
    pub csv_path: PathBuf,
    pub json_path: PathBuf,
    pub record_count: usize,
}

/// Orchestrates the two stages: the session driver yields a CSV file,
/// the normalizer turns it into the JSON document. Strictly
/// sequential, no feedback loop; any failure aborts the run.
pub struct ExportReservations {
    driver: Arc<dyn SessionDriver + Send + Sync>,
    normalizer: RecordNormalizer,
}

impl ExportReservations {
    pub fn new(
        driver: Arc<dyn SessionDriver + Send + Sync>,
        normalizer: RecordNormalizer,
    ) -> Self {
        Self { driver, normalizer }
    }

    pub async fn execute(&self, range: &DateRange, out_dir: &Path) -> Result<ExportSummary> {
        let session = self.driver.authenticate().await?;
        info!(email = %session.email, "authenticated against the dashboard");

        let csv_path = self.driver.export_reservations(&session, range).await?;
        info!(csv = %csv_path.display(), "export downloaded");

        let records = self.normalizer.normalize_file(&csv_path)?;
        let json_path = out_dir.join(range.output_filename());
        self.normalizer.write_json(&records, &json_path)?;
        info!(
            records = records.len(),
            output = %json_path.display(),
            "reservations written"
        );

        Ok(ExportSummary {
            csv_path,
            json_path,
            record_count: records.len(),
        })
    }
}
