use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::info;

use crate::application::use_cases::export::ExportReservations;
use crate::application::use_cases::normalize::RecordNormalizer;
use crate::domain::date_range::DateRange;
use crate::domain::error::Result;
use crate::infrastructure::browser::PlaywrightDriver;
use crate::infrastructure::config::Settings;

/// Export reservations from the booking dashboard as normalized JSON.
#[derive(Debug, Parser)]
#[command(name = "resv_export", version, about)]
pub struct Cli {
    /// Start of the reservation date filter (DD-MM-YYYY).
    #[arg(long)]
    pub from: String,

    /// End of the reservation date filter (DD-MM-YYYY).
    #[arg(long)]
    pub to: String,

    /// Directory the downloaded CSV and the JSON output land in.
    #[arg(long, default_value = "out")]
    pub out_dir: PathBuf,

    /// Normalize an existing CSV export instead of driving the browser.
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Comma-separated columns to keep (default: every header column).
    #[arg(long, value_delimiter = ',')]
    pub columns: Option<Vec<String>>,

    /// Override the Playwright driver script path.
    #[arg(long, env = "DRIVER_SCRIPT")]
    pub script: Option<PathBuf>,
}

pub async fn run(cli: Cli) -> Result<()> {
    let range = DateRange::parse(&cli.from, &cli.to)?;

    let mut normalizer = RecordNormalizer::new();
    if let Some(columns) = cli.columns.clone() {
        normalizer = normalizer.with_columns(columns);
    }

    // Offline mode: the session driver already ran (or the CSV came
    // from elsewhere); only the normalizer is exercised.
    if let Some(input) = &cli.input {
        let json_path = cli.out_dir.join(range.output_filename());
        let count = normalizer.run(input, &json_path)?;
        println!("Saved {} reservations to {}", count, json_path.display());
        return Ok(());
    }

    let mut settings = Settings::load()?;
    if let Some(script) = cli.script.clone() {
        settings.driver_script = script;
    }
    info!(site = %settings.website_url, "starting dashboard export");

    let driver = Arc::new(PlaywrightDriver::new(settings, cli.out_dir.clone()));
    let use_case = ExportReservations::new(driver, normalizer);
    let summary = use_case.execute(&range, &cli.out_dir).await?;
    println!(
        "Saved {} reservations to {}",
        summary.record_count,
        summary.json_path.display()
    );
    Ok(())
}
