//! Headless-browser session driver.
//!
//! This module wraps a Node.js Playwright script that logs into the
//! booking dashboard, applies the reservation date filter, and hands
//! back the CSV export URL together with the authenticated session
//! cookies. The Rust side never touches the DOM; every selector lives
//! in the script, which is where the known fragility sits — a site
//! layout change breaks the script, not this wrapper.

use std::path::PathBuf;
use std::process::Command;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::domain::date_range::DateRange;
use crate::domain::error::{AppError, Result};
use crate::infrastructure::config::Settings;
use crate::infrastructure::http::CsvDownloader;

const RESULT_MARKER: &str = "---RESULT---";
const DOWNLOAD_TIMEOUT_SECS: u64 = 60;

/// Cookie handed over from the browser session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionCookie {
    pub name: String,
    pub value: String,
}

/// Manifest the driver script prints after the result marker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportManifest {
    #[serde(rename = "exportUrl")]
    pub export_url: String,
    #[serde(rename = "pageUrl")]
    pub page_url: String,
    pub cookies: Vec<SessionCookie>,
}

/// Progress lines streamed by the driver script.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DriverProgress {
    Navigating { url: String },
    LoggingIn { email: String },
    DashboardReady,
    ApplyingFilters { from: String, to: String },
    FiltersApplied { url: String },
    ExportReady { url: String },
}

/// An authenticated dashboard session.
///
/// The browser process owns the actual login state; this handle means
/// "the environment can log in": Node.js is present, the driver script
/// exists, credentials are set. Login itself happens inside the export
/// run because the browser lives and dies with the subprocess.
#[derive(Debug, Clone)]
pub struct Session {
    pub email: String,
}

/// Capability seam for the excluded browser-automation stage, so the
/// normalizer and orchestration can be exercised with a stub.
#[async_trait]
pub trait SessionDriver {
    async fn authenticate(&self) -> Result<Session>;

    /// Export the filtered reservation list and return the path of the
    /// downloaded CSV.
    async fn export_reservations(&self, session: &Session, range: &DateRange)
        -> Result<PathBuf>;
}

/// The real driver: Playwright subprocess plus cookie-carrying HTTP
/// download.
pub struct PlaywrightDriver {
    settings: Settings,
    download_dir: PathBuf,
    downloader: CsvDownloader,
}

impl PlaywrightDriver {
    pub fn new(settings: Settings, download_dir: PathBuf) -> Self {
        Self {
            settings,
            download_dir,
            downloader: CsvDownloader::new(DOWNLOAD_TIMEOUT_SECS),
        }
    }
}

#[async_trait]
impl SessionDriver for PlaywrightDriver {
    async fn authenticate(&self) -> Result<Session> {
        let node = check_nodejs()?;
        if !self.settings.driver_script.exists() {
            return Err(AppError::Environment(format!(
                "driver script not found at: {}",
                self.settings.driver_script.display()
            )));
        }
        let (email, _) = self.settings.credentials()?;
        debug!(node = %node, script = %self.settings.driver_script.display(), "driver environment ready");
        Ok(Session {
            email: email.to_string(),
        })
    }

    async fn export_reservations(
        &self,
        session: &Session,
        range: &DateRange,
    ) -> Result<PathBuf> {
        let (email, pass) = self.settings.credentials()?;
        info!(
            email = %session.email,
            from = %range.site_from(),
            to = %range.site_to(),
            "driving dashboard export"
        );

        // Credentials travel via the child's environment, never argv.
        let output = Command::new("node")
            .arg(&self.settings.driver_script)
            .arg(&self.settings.website_url)
            .arg(range.site_from())
            .arg(range.site_to())
            .env("USER_EMAIL", email)
            .env("USER_PASS", pass)
            .output()
            .map_err(|e| AppError::Automation(format!("failed to run driver script: {}", e)))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        for progress in parse_progress_lines(&stdout) {
            debug!(?progress, "driver progress");
        }

        if !output.status.success() {
            let message = if !stderr.trim().is_empty() {
                stderr.to_string()
            } else {
                stdout.to_string()
            };
            return Err(AppError::Automation(format!(
                "driver script failed: {}",
                message.trim()
            )));
        }

        let manifest = parse_manifest(&stdout)?;

        std::fs::create_dir_all(&self.download_dir)?;
        let csv_path = self.download_dir.join(format!(
            "reservations_{}_to_{}.csv",
            range.file_from(),
            range.file_to()
        ));
        self.downloader.download(&manifest, &csv_path).await?;
        Ok(csv_path)
    }
}

/// Check that a Node.js runtime is available and return its version.
pub fn check_nodejs() -> Result<String> {
    let output = Command::new("node").arg("--version").output().map_err(|e| {
        AppError::Environment(format!(
            "Node.js not found. Install Node.js to drive the dashboard: {}",
            e
        ))
    })?;

    if !output.status.success() {
        return Err(AppError::Environment(
            "failed to get Node.js version".to_string(),
        ));
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

fn parse_progress_lines(stdout: &str) -> Vec<DriverProgress> {
    stdout
        .lines()
        .take_while(|line| !line.contains(RESULT_MARKER))
        .filter(|line| line.starts_with('{'))
        .filter_map(|line| serde_json::from_str(line).ok())
        .collect()
}

fn parse_manifest(stdout: &str) -> Result<ExportManifest> {
    let raw = stdout
        .split(RESULT_MARKER)
        .nth(1)
        .map(str::trim)
        .ok_or_else(|| {
            AppError::Automation("no result manifest in driver output".to_string())
        })?;
    serde_json::from_str(raw)
        .map_err(|e| AppError::Automation(format!("failed to parse driver manifest: {}", e)))
}
