//! Configuration management for slotwatch

use chrono::{Days, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{ConfigError, Result};

/// Production authentication endpoint
const DEFAULT_AUTH_URL: &str = "https://api.rijbewijs.sbat.be/praktijk/api/user/authenticate";

/// Production availability endpoint
const DEFAULT_AVAILABILITY_URL: &str = "https://api.rijbewijs.sbat.be/praktijk/api/exam/available";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Account email used against the authentication endpoint
    pub username: String,

    /// Account password
    pub password: String,

    /// Authentication endpoint URL
    #[serde(default = "default_auth_url")]
    pub auth_url: String,

    /// Availability endpoint URL
    #[serde(default = "default_availability_url")]
    pub availability_url: String,

    /// Webhook URL that receives the slot digest
    pub webhook_url: String,

    /// License type sent with every availability query
    #[serde(default = "default_license_type")]
    pub license_type: String,

    /// Exam type sent with every availability query
    #[serde(default = "default_exam_type")]
    pub exam_type: String,

    /// Exam centers to poll, in notification order
    pub centers: Vec<ExamCenter>,

    /// Only slots starting inside this window are reported
    pub window: DateWindow,

    /// Where the bearer token is cached between runs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_file: Option<PathBuf>,
}

/// One exam center: upstream numeric id plus display name
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamCenter {
    pub id: u32,
    pub name: String,
}

/// Inclusive datetime range, timezone-naive like the upstream API
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl DateWindow {
    /// True if `t` lies within the window, both ends inclusive
    pub fn contains(&self, t: NaiveDateTime) -> bool {
        self.start <= t && t <= self.end
    }
}

fn default_auth_url() -> String {
    DEFAULT_AUTH_URL.to_string()
}

fn default_availability_url() -> String {
    DEFAULT_AVAILABILITY_URL.to_string()
}

fn default_license_type() -> String {
    "B".to_string()
}

fn default_exam_type() -> String {
    "E2".to_string()
}

impl Config {
    /// Get the default config file path
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or(ConfigError::Invalid(
            "Could not determine home directory".to_string(),
        ))?;

        Ok(home.join(".slotwatch").join("config.yaml"))
    }

    /// Resolve the config path, honoring an explicit override
    pub fn resolve_path(path: Option<&str>) -> Result<PathBuf> {
        match path {
            Some(p) => Ok(PathBuf::from(p)),
            None => Self::default_path(),
        }
    }

    /// Load configuration, honoring an explicit path override
    pub fn load_at(path: Option<&str>) -> Result<Self> {
        let path = Self::resolve_path(path)?;
        if !path.exists() {
            return Err(ConfigError::NotFound.into());
        }

        let contents = std::fs::read_to_string(&path)?;
        let config: Config = serde_yaml::from_str(&contents).map_err(ConfigError::from)?;

        Ok(config)
    }

    /// Save configuration, honoring an explicit path override
    pub fn save_at(&self, path: Option<&str>) -> Result<()> {
        let path = Self::resolve_path(path)?;

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = serde_yaml::to_string(self)
            .map_err(|e| ConfigError::SaveError(e.to_string()))?;

        std::fs::write(&path, contents)?;

        // The config holds the account password, keep it private
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(&path)?.permissions();
            perms.set_mode(0o600);
            std::fs::set_permissions(&path, perms)?;
        }

        Ok(())
    }

    /// Where the bearer token is cached (`token_file` or the default slot)
    pub fn token_path(&self) -> Result<PathBuf> {
        match &self.token_file {
            Some(p) => Ok(p.clone()),
            None => {
                let home = dirs::home_dir().ok_or(ConfigError::Invalid(
                    "Could not determine home directory".to_string(),
                ))?;
                Ok(home.join(".slotwatch").join("token.txt"))
            }
        }
    }

    /// Validate that the configuration is usable for a polling run
    pub fn validate(&self) -> Result<()> {
        if self.username.trim().is_empty() || self.password.trim().is_empty() {
            return Err(ConfigError::MissingCredentials.into());
        }
        if self.window.start > self.window.end {
            return Err(ConfigError::Invalid(
                "window start must not be after window end".to_string(),
            )
            .into());
        }
        if self.centers.is_empty() {
            return Err(ConfigError::Invalid("no exam centers configured".to_string()).into());
        }
        Ok(())
    }

    /// Build a config for a fresh account with production defaults.
    ///
    /// The window defaults to the coming week; operators adjust it in the
    /// config file once they know which dates they are hunting for.
    pub fn with_account(username: String, password: String, webhook_url: String) -> Self {
        let today = chrono::Local::now()
            .date_naive()
            .and_hms_opt(0, 0, 0)
            .expect("midnight is always valid");
        let week_out = today
            .checked_add_days(Days::new(7))
            .expect("date within chrono range")
            .date()
            .and_hms_opt(23, 59, 59)
            .expect("valid time of day");

        Self {
            username,
            password,
            auth_url: default_auth_url(),
            availability_url: default_availability_url(),
            webhook_url,
            license_type: default_license_type(),
            exam_type: default_exam_type(),
            centers: vec![
                ExamCenter { id: 1, name: "Sint-Denijs-Westrem".to_string() },
                ExamCenter { id: 7, name: "Brakel".to_string() },
                ExamCenter { id: 8, name: "Eeklo".to_string() },
                ExamCenter { id: 9, name: "Erembodegem".to_string() },
                ExamCenter { id: 10, name: "Sint-Niklaas".to_string() },
            ],
            window: DateWindow {
                start: today,
                end: week_out,
            },
            token_file: None,
        }
    }
}
