//! CSV export download.
//!
//! The browser never downloads the file itself: it hands over the
//! export link and its session cookies, and this client fetches the
//! CSV over plain HTTP. One-way handoff — the normalizer only ever
//! sees "a CSV file at path P, or a failure".

use std::path::Path;
use std::time::Duration;

use reqwest::header::COOKIE;
use reqwest::Client;
use tracing::info;
use url::Url;

use crate::domain::error::{AppError, Result};
use crate::infrastructure::browser::{ExportManifest, SessionCookie};

pub struct CsvDownloader {
    client: Client,
}

impl CsvDownloader {
    pub fn new(timeout_secs: u64) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .user_agent(concat!("resv_export/", env!("CARGO_PKG_VERSION")))
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }

    /// Fetch the export named by `manifest` and write it to `dest`.
    pub async fn download(&self, manifest: &ExportManifest, dest: &Path) -> Result<()> {
        let export_url = resolve_export_url(&manifest.page_url, &manifest.export_url)?;
        info!(url = %export_url, "downloading CSV export");

        let response = self
            .client
            .get(export_url.clone())
            .header(COOKIE, cookie_header(&manifest.cookies))
            .send()
            .await
            .map_err(|e| AppError::Http(format!("failed to fetch {}: {}", export_url, e)))?;

        if !response.status().is_success() {
            return Err(AppError::Http(format!(
                "export download failed ({}): {}",
                response.status(),
                export_url
            )));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| AppError::Http(format!("failed to read export body: {}", e)))?;

        if let Some(parent) = dest.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(dest, &body)?;
        Ok(())
    }
}

/// Resolve the export href against the filtered page's URL, the same
/// way a browser would.
fn resolve_export_url(page_url: &str, href: &str) -> Result<Url> {
    let base = Url::parse(page_url)
        .map_err(|e| AppError::Http(format!("invalid page URL {}: {}", page_url, e)))?;
    base.join(href)
        .map_err(|e| AppError::Http(format!("invalid export link {}: {}", href, e)))
}

fn cookie_header(cookies: &[SessionCookie]) -> String {
    cookies
        .iter()
        .map(|cookie| format!("{}={}", cookie.name, cookie.value))
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cookie(name: &str, value: &str) -> SessionCookie {
        SessionCookie {
            name: name.to_string(),
            value: value.to_string(),
        }
    }

    #[test]
    fn relative_href_is_joined_to_the_page() {
        let url = resolve_export_url(
            "https://app.example.com/reservations?date_from=x",
            "/export.csv?filter=1",
        )
        .unwrap();
        assert_eq!(url.as_str(), "https://app.example.com/export.csv?filter=1");
    }

    #[test]
    fn absolute_href_wins_over_the_page() {
        let url = resolve_export_url(
            "https://app.example.com/reservations",
            "https://files.example.com/export.csv",
        )
        .unwrap();
        assert_eq!(url.as_str(), "https://files.example.com/export.csv");
    }

    #[test]
    fn bad_page_url_is_an_http_error() {
        let err = resolve_export_url("not a url", "/export.csv").unwrap_err();
        assert!(matches!(err, AppError::Http(_)));
    }

    #[test]
    fn cookie_header_joins_pairs() {
        let header = cookie_header(&[cookie("_session", "abc"), cookie("remember", "1")]);
        assert_eq!(header, "_session=abc; remember=1");
    }
}
