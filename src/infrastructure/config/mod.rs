use std::path::PathBuf;

use figment::providers::{Env, Format, Toml};
use figment::Figment;
use serde::Deserialize;

use crate::domain::error::{AppError, Result};

pub const DEFAULT_WEBSITE_URL: &str = "https://app.littlehotelier.com/";
const DEFAULT_DRIVER_SCRIPT: &str = "scripts/export_reservations.js";
const CONFIG_FILE: &str = "resv_export.toml";

/// Everything a run needs from the outside world, resolved once at
/// startup. Nothing else in the crate reads the environment.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Dashboard entry point (`WEBSITE_URL`).
    #[serde(default = "default_website_url")]
    pub website_url: String,
    /// Login email (`USER_EMAIL`).
    #[serde(default)]
    pub user_email: Option<String>,
    /// Login password (`USER_PASS`).
    #[serde(default)]
    pub user_pass: Option<String>,
    /// Path to the Playwright driver script (`DRIVER_SCRIPT`).
    #[serde(default = "default_driver_script")]
    pub driver_script: PathBuf,
}

impl Settings {
    /// Merge the optional `resv_export.toml` with the environment.
    /// `.env` loading (dotenvy) happens in `main` before this runs.
    pub fn load() -> Result<Self> {
        Figment::new()
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::raw().only(&[
                "WEBSITE_URL",
                "USER_EMAIL",
                "USER_PASS",
                "DRIVER_SCRIPT",
            ]))
            .extract()
            .map_err(|e| AppError::Environment(format!("failed to read configuration: {}", e)))
    }

    /// Both credentials, or a single up-front `Environment` error
    /// before any browser work starts.
    pub fn credentials(&self) -> Result<(&str, &str)> {
        match (self.user_email.as_deref(), self.user_pass.as_deref()) {
            (Some(email), Some(pass)) if !email.is_empty() && !pass.is_empty() => {
                Ok((email, pass))
            }
            _ => Err(AppError::Environment(
                "missing USER_EMAIL / USER_PASS (set them in the environment or a .env file)"
                    .to_string(),
            )),
        }
    }
}

fn default_website_url() -> String {
    DEFAULT_WEBSITE_URL.to_string()
}

fn default_driver_script() -> PathBuf {
    PathBuf::from(DEFAULT_DRIVER_SCRIPT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_env_is_empty() {
        figment::Jail::expect_with(|_jail| {
            let settings = Settings::load().unwrap();
            assert_eq!(settings.website_url, DEFAULT_WEBSITE_URL);
            assert_eq!(
                settings.driver_script,
                PathBuf::from(DEFAULT_DRIVER_SCRIPT)
            );
            assert!(settings.credentials().is_err());
            Ok(())
        });
    }

    #[test]
    fn env_overrides_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("WEBSITE_URL", "https://dashboard.example.com/");
            jail.set_env("USER_EMAIL", "host@example.com");
            jail.set_env("USER_PASS", "hunter2");
            let settings = Settings::load().unwrap();
            assert_eq!(settings.website_url, "https://dashboard.example.com/");
            let (email, pass) = settings.credentials().unwrap();
            assert_eq!(email, "host@example.com");
            assert_eq!(pass, "hunter2");
            Ok(())
        });
    }

    #[test]
    fn empty_credentials_are_rejected() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("USER_EMAIL", "host@example.com");
            jail.set_env("USER_PASS", "");
            let settings = Settings::load().unwrap();
            assert!(matches!(
                settings.credentials(),
                Err(AppError::Environment(_))
            ));
            Ok(())
        });
    }

    #[test]
    fn toml_file_is_merged_under_env() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                CONFIG_FILE,
                r#"
                    website_url = "https://from-toml.example.com/"
                    user_email = "toml@example.com"
                    user_pass = "from-toml"
                "#,
            )?;
            jail.set_env("USER_PASS", "from-env");
            let settings = Settings::load().unwrap();
            assert_eq!(settings.website_url, "https://from-toml.example.com/");
            let (email, pass) = settings.credentials().unwrap();
            assert_eq!(email, "toml@example.com");
            assert_eq!(pass, "from-env");
            Ok(())
        });
    }
}
