//! Minimal metrics registry for the exporter.
//!
//! Gauge/counter/histogram types with dynamic labels backed by `DashMap`.
//! Labels are flattened into sorted key vectors to keep deterministic ordering.
//! Two sinks are built from them:
//! - `IssueMetrics`: the issue series, rebuilt from scratch every refresh cycle
//!   and swapped in whole.
//! - `ExporterMetrics`: the exporter's own health, alive for the whole process.

use dashmap::DashMap;
use std::fmt::Write;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::time::Duration;

type LabelKey = Vec<(String, String)>;

fn label_key(labels: &[(&str, &str)]) -> LabelKey {
    let mut key: LabelKey = labels
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    key.sort();
    key
}

/// Helper to escape label values.
fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

fn label_str(key: &LabelKey) -> String {
    key.iter()
        .map(|(k, v)| format!("{}=\"{}\"", k, escape_label(v)))
        .collect::<Vec<_>>()
        .join(",")
}

fn write_header(out: &mut String, name: &str, help: &str, kind: &str) {
    let _ = writeln!(out, "# HELP {} {}", name, help);
    let _ = writeln!(out, "# TYPE {} {}", name, kind);
}

#[derive(Default)]
pub struct CounterVec {
    map: DashMap<LabelKey, AtomicU64>,
}

impl CounterVec {
    /// Increment by 1.
    pub fn inc(&self, labels: &[(&str, &str)]) {
        self.add(labels, 1);
    }

    /// Increment by an arbitrary value.
    pub fn add(&self, labels: &[(&str, &str)], v: u64) {
        let counter = self
            .map
            .entry(label_key(labels))
            .or_insert_with(|| AtomicU64::new(0));
        counter.fetch_add(v, Ordering::Relaxed);
    }

    pub fn get(&self, labels: &[(&str, &str)]) -> Option<u64> {
        self.map
            .get(&label_key(labels))
            .map(|c| c.load(Ordering::Relaxed))
    }

    /// Render in Prometheus text exposition format.
    fn render(&self, name: &str, help: &str, out: &mut String) {
        write_header(out, name, help, "counter");
        for r in self.map.iter() {
            let val = r.value().load(Ordering::Relaxed);
            let _ = writeln!(out, "{}{{{}}} {}", name, label_str(r.key()), val);
        }
    }
}

#[derive(Default)]
pub struct GaugeVec {
    map: DashMap<LabelKey, AtomicI64>,
}

impl GaugeVec {
    /// Increment by 1.
    pub fn inc(&self, labels: &[(&str, &str)]) {
        self.add(labels, 1);
    }

    /// Add an arbitrary signed delta.
    pub fn add(&self, labels: &[(&str, &str)], v: i64) {
        let gauge = self
            .map
            .entry(label_key(labels))
            .or_insert_with(|| AtomicI64::new(0));
        gauge.fetch_add(v, Ordering::Relaxed);
    }

    pub fn get(&self, labels: &[(&str, &str)]) -> Option<i64> {
        self.map
            .get(&label_key(labels))
            .map(|g| g.load(Ordering::Relaxed))
    }

    /// Number of label sets with a value.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Render in Prometheus text exposition format.
    fn render(&self, name: &str, help: &str, out: &mut String) {
        write_header(out, name, help, "gauge");
        for r in self.map.iter() {
            let val = r.value().load(Ordering::Relaxed);
            let _ = writeln!(out, "{}{{{}}} {}", name, label_str(r.key()), val);
        }
    }
}

const DAY_HOURS: f64 = 24.0;
const WEEK_HOURS: f64 = 7.0 * DAY_HOURS;
const MONTH_HOURS: f64 = 30.41 * DAY_HOURS;
const YEAR_HOURS: f64 = 12.0 * MONTH_HOURS;

/// Fixed buckets in hours: 1h, 1d, 2d, 4d, 1w, 2w, 1mo, 2mo, 4mo, 1y, 2y.
pub const BUCKETS_HOURS: [f64; 11] = [
    1.0,
    DAY_HOURS,
    2.0 * DAY_HOURS,
    4.0 * DAY_HOURS,
    WEEK_HOURS,
    2.0 * WEEK_HOURS,
    MONTH_HOURS,
    2.0 * MONTH_HOURS,
    4.0 * MONTH_HOURS,
    YEAR_HOURS,
    2.0 * YEAR_HOURS,
];

#[derive(Default)]
struct HourHistogram {
    count: u64,
    sum: f64,
    buckets: [u64; 11],
}

/// Count and sum of one histogram series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistogramSnapshot {
    pub count: u64,
    pub sum: f64,
}

/// Histogram of hour values. Observations go through the map's entry lock, so
/// the cells need no atomics.
#[derive(Default)]
pub struct HistogramVec {
    map: DashMap<LabelKey, HourHistogram>,
}

impl HistogramVec {
    /// Observe a value in hours and increment cumulative buckets.
    pub fn observe(&self, labels: &[(&str, &str)], hours: f64) {
        let mut hist = self.map.entry(label_key(labels)).or_default();
        hist.count += 1;
        hist.sum += hours;

        // Cumulative Buckets: Increment ALL buckets larger than value
        for (i, &le) in BUCKETS_HOURS.iter().enumerate() {
            if hours <= le {
                hist.buckets[i] += 1;
            }
        }
    }

    pub fn snapshot(&self, labels: &[(&str, &str)]) -> Option<HistogramSnapshot> {
        self.map.get(&label_key(labels)).map(|h| HistogramSnapshot {
            count: h.count,
            sum: h.sum,
        })
    }

    /// Number of label sets with observations.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Render in Prometheus text exposition format (unit: hours).
    fn render(&self, name: &str, help: &str, out: &mut String) {
        write_header(out, name, help, "histogram");
        for r in self.map.iter() {
            let hist = r.value();
            let labels = label_str(r.key());
            let prefix = if labels.is_empty() { String::new() } else { format!("{},", labels) };

            for (i, &le) in BUCKETS_HOURS.iter().enumerate() {
                let _ = writeln!(out, "{}_bucket{{{}le=\"{}\"}} {}", name, prefix, le, hist.buckets[i]);
            }
            let _ = writeln!(out, "{}_bucket{{{}le=\"+Inf\"}} {}", name, prefix, hist.count);
            let _ = writeln!(out, "{}_sum{{{}}} {}", name, labels, hist.sum);
            let _ = writeln!(out, "{}_count{{{}}} {}", name, labels, hist.count);
        }
    }
}

/// Issue series for one refresh cycle.
#[derive(Default)]
pub struct IssueMetrics {
    /// Labels: project, priority, status, statusCategory, assignee, issueType.
    pub issue_count: GaugeVec,
    /// Labels: project, priority, assignee, issueType, status, statusCategory.
    pub time_in_status: HistogramVec,
}

impl IssueMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(&self, out: &mut String) {
        self.issue_count
            .render("jira_issue_count", "Count of Jira issues by various labels.", out);
        self.time_in_status.render(
            "jira_issue_time_in_status_hours",
            "Time spent by issues in each status.",
            out,
        );
    }
}

/// Exporter health, kept across refresh cycles.
#[derive(Default)]
pub struct ExporterMetrics {
    /// Label: outcome (success|error).
    pub refreshes: CounterVec,
    /// Label: kind (ErrorKind::as_str).
    pub refresh_errors: CounterVec,
    last_refresh_issues: AtomicU64,
    last_refresh_duration_millis: AtomicU64,
    last_success_unix: AtomicI64,
}

impl ExporterMetrics {
    pub fn record_success(&self, issues: usize, elapsed: Duration, finished_unix: i64) {
        self.refreshes.inc(&[("outcome", "success")]);
        self.last_refresh_issues.store(issues as u64, Ordering::Relaxed);
        self.last_refresh_duration_millis
            .store(elapsed.as_millis() as u64, Ordering::Relaxed);
        self.last_success_unix.store(finished_unix, Ordering::Relaxed);
    }

    pub fn record_failure(&self, kind: &str) {
        self.refreshes.inc(&[("outcome", "error")]);
        self.refresh_errors.inc(&[("kind", kind)]);
    }

    pub fn last_refresh_issues(&self) -> u64 {
        self.last_refresh_issues.load(Ordering::Relaxed)
    }

    pub fn render(&self, out: &mut String) {
        self.refreshes
            .render("jira_exporter_refreshes_total", "Refresh cycles by outcome.", out);
        self.refresh_errors.render(
            "jira_exporter_refresh_errors_total",
            "Failed refresh cycles by error kind.",
            out,
        );

        let gauges = [
            (
                "jira_exporter_last_refresh_issues",
                "Issues published by the last successful refresh.",
                self.last_refresh_issues.load(Ordering::Relaxed) as i64,
            ),
            (
                "jira_exporter_last_refresh_duration_millis",
                "Duration of the last successful refresh.",
                self.last_refresh_duration_millis.load(Ordering::Relaxed) as i64,
            ),
            (
                "jira_exporter_last_success_timestamp_seconds",
                "Unix time of the last successful refresh.",
                self.last_success_unix.load(Ordering::Relaxed),
            ),
        ];
        for (name, help, v) in gauges {
            write_header(out, name, help, "gauge");
            let _ = writeln!(out, "{} {}", name, v);
        }
    }
}
