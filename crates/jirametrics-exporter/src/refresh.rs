//! Refresh orchestration.
//!
//! One cycle: status catalog -> issue fetch -> aggregate and publish into a
//! fresh `IssueMetrics` -> swap it in. Scrapers read whichever snapshot is
//! current, so they never see a half-built metric set, and a failed cycle
//! leaves the last good snapshot in place.

use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use jirametrics_core::error::Result;

use crate::obs::{ExporterMetrics, IssueMetrics};
use crate::publish::publish_issues;
use crate::tracker::{build_status_catalog, fetch_all_issues, TrackerApi};

/// What a successful cycle did.
#[derive(Debug, Clone)]
pub struct RefreshReport {
    pub statuses: usize,
    pub issues: usize,
    pub fetch_elapsed: Duration,
    pub publish_elapsed: Duration,
}

impl RefreshReport {
    pub fn total_elapsed(&self) -> Duration {
        self.fetch_elapsed + self.publish_elapsed
    }
}

/// The snapshot served to scrapers.
#[derive(Default)]
pub struct MetricsSlot {
    current: RwLock<Arc<IssueMetrics>>,
}

impl MetricsSlot {
    pub fn load(&self) -> Arc<IssueMetrics> {
        // A poisoned lock still holds a complete snapshot; keep serving it.
        match self.current.read() {
            Ok(g) => Arc::clone(&g),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    pub fn swap(&self, next: Arc<IssueMetrics>) {
        match self.current.write() {
            Ok(mut g) => *g = next,
            Err(poisoned) => *poisoned.into_inner() = next,
        }
    }
}

pub struct Refresher {
    tracker: Arc<dyn TrackerApi>,
    jql: String,
    slot: MetricsSlot,
    obs: Arc<ExporterMetrics>,
    // one cycle at a time, whoever triggers it
    running: Mutex<()>,
}

impl Refresher {
    pub fn new(tracker: Arc<dyn TrackerApi>, jql: String, obs: Arc<ExporterMetrics>) -> Self {
        Self {
            tracker,
            jql,
            slot: MetricsSlot::default(),
            obs,
            running: Mutex::new(()),
        }
    }

    /// Latest complete issue metrics (empty before the first success).
    pub fn current(&self) -> Arc<IssueMetrics> {
        self.slot.load()
    }

    pub fn jql(&self) -> &str {
        &self.jql
    }

    /// Run one cycle. Failures are logged and counted here; callers decide
    /// whether to surface them.
    pub async fn refresh(&self) -> Result<RefreshReport> {
        let _guard = self.running.lock().await;

        match self.run_cycle().await {
            Ok(report) => {
                self.obs
                    .record_success(report.issues, report.total_elapsed(), unix_now());
                tracing::info!(
                    statuses = report.statuses,
                    issues = report.issues,
                    fetch_ms = report.fetch_elapsed.as_millis() as u64,
                    publish_ms = report.publish_elapsed.as_millis() as u64,
                    "metrics refreshed"
                );
                Ok(report)
            }
            Err(e) => {
                self.obs.record_failure(e.kind().as_str());
                tracing::error!(kind = e.kind().as_str(), error = %e, "refresh failed, keeping previous metrics");
                Err(e)
            }
        }
    }

    async fn run_cycle(&self) -> Result<RefreshReport> {
        let started = Instant::now();
        let catalog = build_status_catalog(self.tracker.as_ref()).await?;
        let issues = fetch_all_issues(self.tracker.as_ref(), &self.jql).await?;
        let fetch_elapsed = started.elapsed();
        tracing::info!(issues = issues.len(), elapsed_ms = fetch_elapsed.as_millis() as u64, "fetched issues");

        let started = Instant::now();
        let shadow = IssueMetrics::new();
        publish_issues(&shadow, &catalog, &issues)?;
        self.slot.swap(Arc::new(shadow));

        Ok(RefreshReport {
            statuses: catalog.len(),
            issues: issues.len(),
            fetch_elapsed,
            publish_elapsed: started.elapsed(),
        })
    }

    /// Refresh now and then every `period`. A failed cycle does not stop the
    /// loop; the next tick is the retry.
    pub fn spawn_interval(self: Arc<Self>, period: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut tick = tokio::time::interval(period);
            tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                tick.tick().await;
                let _ = self.refresh().await;
            }
        })
    }
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default()
}
