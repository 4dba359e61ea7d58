//! Shared application state for the exporter.
//!
//! Startup errors are returned, not panicked, so `main` can log and exit.

use std::sync::Arc;

use jirametrics_core::error::Result;

use crate::config::ExporterConfig;
use crate::obs::ExporterMetrics;
use crate::refresh::Refresher;
use crate::tracker::{build_issue_search_jql, JiraClient, TrackerApi};

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
    tracker: Arc<dyn TrackerApi>,
    refresher: Arc<Refresher>,
    obs: Arc<ExporterMetrics>,
}

struct AppStateInner {
    cfg: ExporterConfig,
}

impl AppState {
    /// Build state backed by the Jira REST client.
    pub fn new(cfg: ExporterConfig) -> Result<Self> {
        let client = JiraClient::new(&cfg.jira)?;
        Ok(Self::with_tracker(cfg, Arc::new(client)))
    }

    pub fn with_tracker(cfg: ExporterConfig, tracker: Arc<dyn TrackerApi>) -> Self {
        let jql = build_issue_search_jql(&cfg.jira.projects, cfg.jira.analyze_period_days);
        tracing::debug!(%jql, "issue search query");

        let obs = Arc::new(ExporterMetrics::default());
        let refresher = Arc::new(Refresher::new(
            Arc::clone(&tracker),
            jql,
            Arc::clone(&obs),
        ));

        Self {
            inner: Arc::new(AppStateInner { cfg }),
            tracker,
            refresher,
            obs,
        }
    }

    pub fn cfg(&self) -> &ExporterConfig {
        &self.inner.cfg
    }

    pub fn tracker(&self) -> Arc<dyn TrackerApi> {
        Arc::clone(&self.tracker)
    }

    pub fn refresher(&self) -> Arc<Refresher> {
        Arc::clone(&self.refresher)
    }

    pub fn exporter_metrics(&self) -> &ExporterMetrics {
        &self.obs
    }
}
