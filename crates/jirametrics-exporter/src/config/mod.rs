//! Exporter config loader.
//!
//! Two sources, never merged:
//! - `CONFIG_FILE=<path>`: strict YAML (unknown fields rejected)
//! - otherwise the process environment (`JIRA_URL`, `PROJECTS`, ...)
//!
//! Every failure is `ExporterError::Config`, which `main` treats as fatal.

pub mod schema;

use std::fs;

use jirametrics_core::error::{ExporterError, Result};

pub use schema::{ExporterConfig, ExporterSection, JiraSection, RefreshMode};

/// Load from `CONFIG_FILE` if set, else from the environment. A `.env` file in
/// the working directory is applied first when present.
pub fn load() -> Result<ExporterConfig> {
    let _ = dotenvy::dotenv();
    match std::env::var("CONFIG_FILE") {
        Ok(path) if !path.is_empty() => load_from_file(&path),
        _ => load_from_env(),
    }
}

pub fn load_from_file(path: &str) -> Result<ExporterConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| ExporterError::Config(format!("read config {path} failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<ExporterConfig> {
    let mut cfg: ExporterConfig = serde_yaml::from_str(s)
        .map_err(|e| ExporterError::Config(format!("invalid yaml: {e}")))?;
    cfg.jira.projects = normalize_projects(cfg.jira.projects.iter().map(String::as_str));
    cfg.validate()?;
    Ok(cfg)
}

pub fn load_from_env() -> Result<ExporterConfig> {
    load_from_vars(|key| std::env::var(key).ok())
}

/// Build config from a variable lookup. Values are trimmed; empty values count
/// as unset.
pub fn load_from_vars<F>(get: F) -> Result<ExporterConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| {
        get(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };
    let required = |key: &str| {
        get(key).ok_or_else(|| ExporterError::Config(format!("{key} env is empty")))
    };

    let analyze_period_days = match get("ANALYZE_PERIOD_DAYS") {
        Some(v) => v.parse().map_err(|e| {
            ExporterError::Config(format!("ANALYZE_PERIOD_DAYS {v:?} is not a day count: {e}"))
        })?,
        None => schema::default_analyze_period_days(),
    };
    let request_timeout_secs = match get("REQUEST_TIMEOUT_SECS") {
        Some(v) => v.parse().map_err(|e| {
            ExporterError::Config(format!("REQUEST_TIMEOUT_SECS {v:?} is not a number: {e}"))
        })?,
        None => schema::default_request_timeout_secs(),
    };
    let refresh_mode = match get("REFRESH_MODE") {
        Some(v) => v.parse()?,
        None => RefreshMode::default(),
    };

    let cfg = ExporterConfig {
        jira: JiraSection {
            url: required("JIRA_URL")?,
            user: required("JIRA_USER")?,
            api_token: required("JIRA_API_TOKEN")?,
            projects: normalize_projects(required("PROJECTS")?.split(',')),
            analyze_period_days,
            request_timeout_secs,
        },
        exporter: ExporterSection {
            listen: required("LISTEN")?,
            data_refresh_period: get("DATA_REFRESH_PERIOD")
                .unwrap_or_else(schema::default_data_refresh_period),
            refresh_mode,
        },
    };
    cfg.validate()?;
    Ok(cfg)
}

fn normalize_projects<'a, I>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    raw.into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
