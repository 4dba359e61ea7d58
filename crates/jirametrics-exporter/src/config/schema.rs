use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;
use jirametrics_core::error::{ExporterError, Result};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExporterConfig {
    pub jira: JiraSection,
    pub exporter: ExporterSection,
}

impl ExporterConfig {
    pub fn validate(&self) -> Result<()> {
        self.jira.validate()?;
        self.exporter.validate()?;
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JiraSection {
    pub url: String,
    pub user: String,
    pub api_token: String,
    pub projects: Vec<String>,

    #[serde(default = "default_analyze_period_days")]
    pub analyze_period_days: u32,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl JiraSection {
    pub fn validate(&self) -> Result<()> {
        if !(self.url.starts_with("http://") || self.url.starts_with("https://")) {
            return Err(ExporterError::Config(format!(
                "jira.url must start with http:// or https:// (got {:?})",
                self.url
            )));
        }
        if self.user.is_empty() || self.api_token.is_empty() {
            return Err(ExporterError::Config(
                "jira.user and jira.api_token must not be empty".into(),
            ));
        }
        if self.projects.iter().all(|p| p.trim().is_empty()) {
            return Err(ExporterError::Config("jira.projects must not be empty".into()));
        }
        if self.analyze_period_days == 0 {
            return Err(ExporterError::Config(
                "jira.analyze_period_days must be at least 1".into(),
            ));
        }
        if !(1..=600).contains(&self.request_timeout_secs) {
            return Err(ExporterError::Config(
                "jira.request_timeout_secs must be between 1 and 600".into(),
            ));
        }
        Ok(())
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExporterSection {
    pub listen: String,

    /// humantime duration, e.g. `5m` or `1h 30m`.
    #[serde(default = "default_data_refresh_period")]
    pub data_refresh_period: String,

    #[serde(default)]
    pub refresh_mode: RefreshMode,
}

impl ExporterSection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr()?;
        self.refresh_period()?;
        Ok(())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|e| {
            ExporterError::Config(format!("exporter.listen {:?} is not a socket address: {e}", self.listen))
        })
    }

    pub fn refresh_period(&self) -> Result<Duration> {
        let period = humantime::parse_duration(&self.data_refresh_period).map_err(|e| {
            ExporterError::Config(format!(
                "exporter.data_refresh_period {:?} is invalid: {e}",
                self.data_refresh_period
            ))
        })?;
        if period.is_zero() {
            return Err(ExporterError::Config(
                "exporter.data_refresh_period must be greater than zero".into(),
            ));
        }
        Ok(period)
    }
}

/// When a refresh cycle runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefreshMode {
    /// Background loop every `data_refresh_period`; scrapes serve the latest
    /// completed cycle and may be up to one period stale.
    #[default]
    Interval,
    /// Every `/metrics` request runs a cycle first; always fresh, but a scrape
    /// takes as long as the whole fetch.
    Scrape,
}

impl FromStr for RefreshMode {
    type Err = ExporterError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "interval" => Ok(RefreshMode::Interval),
            "scrape" => Ok(RefreshMode::Scrape),
            other => Err(ExporterError::Config(format!(
                "refresh mode must be \"interval\" or \"scrape\" (got {other:?})"
            ))),
        }
    }
}

pub(crate) fn default_analyze_period_days() -> u32 {
    90
}
pub(crate) fn default_request_timeout_secs() -> u64 {
    30
}
pub(crate) fn default_data_refresh_period() -> String {
    "5m".into()
}
