// src/config.rs
use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use crate::error::ConfigError;
use crate::scheduler::DailySchedule;
use crate::types::KeywordProfile;

/// Placeholder written into fresh configs; treated as "no password"
pub const PASSWORD_PLACEHOLDER: &str = "your_app_password_here";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub personal_info: PersonalInfo,
    pub job_search: JobSearchConfig,
    #[serde(default)]
    pub email_config: EmailConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub linkedin: String,
    pub github: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSearchConfig {
    pub keywords: Vec<String>,
    #[serde(default)]
    pub locations: Vec<String>,
    #[serde(default)]
    pub experience_level: Vec<String>,
    #[serde(default)]
    pub job_types: Vec<String>,
    #[serde(default = "default_feeds")]
    pub feeds: Vec<String>,
    #[serde(default = "default_max_per_feed")]
    pub max_per_feed: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    #[serde(default = "default_smtp_server")]
    pub smtp_server: String,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    #[serde(default)]
    pub sender_email: String,
    #[serde(default)]
    pub sender_password: String,
    #[serde(default)]
    pub recipient_email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_base_dir")]
    pub base_dir: PathBuf,
    #[serde(default = "default_templates_dir")]
    pub templates_dir: PathBuf,
    #[serde(default)]
    pub compile_pdf: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    #[serde(default = "default_schedule_times")]
    pub times: Vec<String>,
    #[serde(default = "default_timeout_minutes")]
    pub timeout_minutes: u64,
    #[serde(default = "default_poll_seconds")]
    pub poll_seconds: u64,
    /// Attempts per slot, including the first
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_retry_delay_seconds")]
    pub retry_delay_seconds: u64,
}

impl ScheduleConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_minutes.saturating_mul(60))
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_seconds)
    }
}

fn default_feeds() -> Vec<String> {
    [
        "https://www.infojobs.net/rss/ofertas-empleo/data-analyst/",
        "https://www.infojobs.net/rss/ofertas-empleo/business-intelligence/",
        "https://www.infojobs.net/rss/ofertas-empleo/big-data/",
        "https://www.infojobs.net/rss/ofertas-empleo/python/",
        "https://www.tecnoempleo.com/rss/ofertas-empleo/data-analyst/",
        "https://www.tecnoempleo.com/rss/ofertas-empleo/business-intelligence/",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_keywords() -> Vec<String> {
    [
        "data analyst",
        "business intelligence",
        "big data",
        "power bi",
        "python",
        "sql",
        "tableau",
        "data science",
        "analytics",
        "etl",
        "data warehouse",
        "machine learning",
        "azure",
        "databricks",
        "spark",
        "pandas",
        "numpy",
        "visualization",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_max_per_feed() -> usize { 5 }
fn default_smtp_server() -> String { "smtp.gmail.com".to_string() }
fn default_smtp_port() -> u16 { 587 }
fn default_base_dir() -> PathBuf { PathBuf::from("job_applications") }
fn default_templates_dir() -> PathBuf { PathBuf::from("templates") }
fn default_schedule_times() -> Vec<String> { vec!["09:00".to_string(), "19:00".to_string()] }
fn default_timeout_minutes() -> u64 { 30 }
fn default_poll_seconds() -> u64 { 60 }
fn default_max_retries() -> u32 { 3 }
fn default_retry_delay_seconds() -> u64 { 300 }

impl Default for JobSearchConfig {
    fn default() -> Self {
        Self {
            keywords: default_keywords(),
            locations: ["España", "Madrid", "Barcelona", "Bilbao", "Valencia", "remote"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            experience_level: vec!["mid-level".to_string(), "senior".to_string(), "junior".to_string()],
            job_types: vec!["full-time".to_string(), "contract".to_string(), "remote".to_string()],
            feeds: default_feeds(),
            max_per_feed: default_max_per_feed(),
        }
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            smtp_server: default_smtp_server(),
            smtp_port: default_smtp_port(),
            sender_email: String::new(),
            sender_password: PASSWORD_PLACEHOLDER.to_string(),
            recipient_email: String::new(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            base_dir: default_base_dir(),
            templates_dir: default_templates_dir(),
            compile_pdf: false,
        }
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            times: default_schedule_times(),
            timeout_minutes: default_timeout_minutes(),
            poll_seconds: default_poll_seconds(),
            max_retries: default_max_retries(),
            retry_delay_seconds: default_retry_delay_seconds(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            personal_info: PersonalInfo {
                name: "Your Name".to_string(),
                email: "you@example.com".to_string(),
                phone: "+34 600 000 000".to_string(),
                location: "Bilbao, España".to_string(),
                linkedin: "https://www.linkedin.com/in/your-profile".to_string(),
                github: "https://github.com/your-account".to_string(),
            },
            job_search: JobSearchConfig::default(),
            email_config: EmailConfig::default(),
            output: OutputConfig::default(),
            schedule: ScheduleConfig::default(),
        }
    }
}

impl EmailConfig {
    /// Whether a real SMTP password has been provided
    pub fn has_credentials(&self) -> bool {
        let password = self.sender_password.trim();
        !password.is_empty() && password != PASSWORD_PLACEHOLDER
    }
}

impl OutputConfig {
    /// Per-day output directory, e.g. `job_applications/2025-06-01`
    pub fn daily_dir(&self, date: NaiveDate) -> PathBuf {
        self.base_dir.join(date.format("%Y-%m-%d").to_string())
    }
}

impl AppConfig {
    /// Load, apply `.env`/environment overrides and validate.
    ///
    /// `SMTP_PASSWORD` and `SENDER_EMAIL` override the matching email fields.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let mut config = Self::from_file(path)?;
        config.apply_overrides(
            std::env::var("SMTP_PASSWORD").ok(),
            std::env::var("SENDER_EMAIL").ok(),
        );
        config.validate()?;

        info!(
            "Loaded configuration from {} ({} keywords, {} feeds)",
            path.display(),
            config.job_search.keywords.len(),
            config.job_search.feeds.len()
        );
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn apply_overrides(&mut self, password: Option<String>, sender: Option<String>) {
        if let Some(password) = password.filter(|p| !p.trim().is_empty()) {
            self.email_config.sender_password = password;
        }
        if let Some(sender) = sender.filter(|s| !s.trim().is_empty()) {
            self.email_config.sender_email = sender;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.profile().is_empty() {
            return Err(ConfigError::EmptyKeywords);
        }

        if self.job_search.max_per_feed == 0 {
            return Err(ConfigError::Invalid(
                "job_search.max_per_feed must be at least 1".to_string(),
            ));
        }

        if self.email_config.has_credentials() {
            if self.email_config.sender_email.trim().is_empty() {
                return Err(ConfigError::Invalid(
                    "email_config.sender_email is required when a password is set".to_string(),
                ));
            }
            if self.email_config.recipient_email.trim().is_empty() {
                return Err(ConfigError::Invalid(
                    "email_config.recipient_email is required when a password is set".to_string(),
                ));
            }
        }

        if self.schedule.timeout_minutes == 0 || self.schedule.poll_seconds == 0 {
            return Err(ConfigError::Invalid(
                "schedule.timeout_minutes and schedule.poll_seconds must be positive".to_string(),
            ));
        }

        if self.schedule.max_retries == 0 {
            return Err(ConfigError::Invalid(
                "schedule.max_retries must be at least 1".to_string(),
            ));
        }

        DailySchedule::parse(&self.schedule.times)?;
        Ok(())
    }

    /// The keyword profile used for relevance and scoring
    pub fn profile(&self) -> KeywordProfile {
        KeywordProfile::new(&self.job_search.keywords)
    }

    /// Write the default configuration. Returns `false` when the file already exists.
    pub fn write_default(path: &Path) -> Result<bool> {
        if path.exists() {
            return Ok(false);
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let content = serde_json::to_string_pretty(&Self::default())
            .context("Failed to serialize default configuration")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write configuration: {}", path.display()))?;

        info!("Default configuration created: {}", path.display());
        Ok(true)
    }
}
