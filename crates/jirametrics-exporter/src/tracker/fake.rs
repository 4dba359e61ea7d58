//! In-memory tracker for unit tests.

use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::json;

use jirametrics_core::error::{ExporterError, Result};
use jirametrics_core::tracker::{issue::Named, Issue, TrackerStatus};

use super::{Myself, TrackerApi};

#[derive(Default)]
pub struct FakeTracker {
    statuses: Mutex<Vec<TrackerStatus>>,
    pages: Mutex<Vec<Vec<Issue>>>,
    statuses_error: Option<ExporterError>,
    search_error_at: Option<(usize, ExporterError)>,
    myself_error: Option<ExporterError>,
    requested_offsets: Mutex<Vec<usize>>,
}

impl FakeTracker {
    pub fn with_statuses(self, statuses: &[(&str, &str)]) -> Self {
        self.set_statuses(statuses);
        self
    }

    pub fn with_pages(self, pages: Vec<Vec<Issue>>) -> Self {
        self.set_pages(pages);
        self
    }

    pub fn failing_statuses(mut self, err: ExporterError) -> Self {
        self.statuses_error = Some(err);
        self
    }

    pub fn failing_search_at(mut self, offset: usize, err: ExporterError) -> Self {
        self.search_error_at = Some((offset, err));
        self
    }

    pub fn failing_myself(mut self, err: ExporterError) -> Self {
        self.myself_error = Some(err);
        self
    }

    pub fn set_statuses(&self, statuses: &[(&str, &str)]) {
        let list = statuses
            .iter()
            .map(|(name, category)| TrackerStatus {
                name: name.to_string(),
                status_category: Named {
                    name: category.to_string(),
                },
            })
            .collect();
        *self.statuses.lock().unwrap() = list;
    }

    /// Pages are served in order; offsets past the last page get an empty page.
    pub fn set_pages(&self, pages: Vec<Vec<Issue>>) {
        *self.pages.lock().unwrap() = pages;
    }

    pub fn requested_offsets(&self) -> Vec<usize> {
        self.requested_offsets.lock().unwrap().clone()
    }
}

fn copy_error(e: &ExporterError) -> ExporterError {
    match e {
        ExporterError::Config(m) => ExporterError::Config(m.clone()),
        ExporterError::Fetch(m) => ExporterError::Fetch(m.clone()),
        ExporterError::Decode(m) => ExporterError::Decode(m.clone()),
        ExporterError::TimestampParse { value, reason } => ExporterError::TimestampParse {
            value: value.clone(),
            reason: reason.clone(),
        },
        ExporterError::UnknownStatus { issue, status } => ExporterError::UnknownStatus {
            issue: issue.clone(),
            status: status.clone(),
        },
        ExporterError::Internal(m) => ExporterError::Internal(m.clone()),
    }
}

#[async_trait]
impl TrackerApi for FakeTracker {
    async fn statuses(&self) -> Result<Vec<TrackerStatus>> {
        if let Some(e) = &self.statuses_error {
            return Err(copy_error(e));
        }
        Ok(self.statuses.lock().unwrap().clone())
    }

    async fn search_page(&self, _jql: &str, start_at: usize) -> Result<Vec<Issue>> {
        self.requested_offsets.lock().unwrap().push(start_at);
        if let Some((offset, e)) = &self.search_error_at {
            if *offset == start_at {
                return Err(copy_error(e));
            }
        }

        let pages = self.pages.lock().unwrap();
        let mut offset = 0;
        for page in pages.iter() {
            if offset == start_at {
                return Ok(page.clone());
            }
            offset += page.len();
        }
        Ok(Vec::new())
    }

    async fn myself(&self) -> Result<Myself> {
        if let Some(e) = &self.myself_error {
            return Err(copy_error(e));
        }
        Ok(Myself {
            email_address: Some("bot@example.com".into()),
            active: true,
        })
    }
}

/// Issue in `status` with the given history (newest first).
pub fn issue_with_history(
    key: &str,
    created: &str,
    status: (&str, &str),
    histories: serde_json::Value,
) -> Issue {
    serde_json::from_value(json!({
        "key": key,
        "changelog": { "histories": histories },
        "fields": {
            "created": created,
            "status": { "name": status.0, "statusCategory": { "name": status.1 } },
            "assignee": { "emailAddress": "dev@example.com" },
            "priority": { "name": "Medium" },
            "project": { "key": "OPS" },
            "issuetype": { "name": "Task" }
        }
    }))
    .unwrap()
}

/// Issue that never changed status.
pub fn plain_issue(key: &str) -> Issue {
    issue_with_history(key, "2024-01-01T00:00:00.000+0000", ("Open", "To Do"), json!([]))
}

/// Open -> In Progress after 48h, In Progress -> Done after another 36h.
pub fn finished_issue(key: &str) -> Issue {
    issue_with_history(
        key,
        "2024-01-01T00:00:00.000+0000",
        ("Done", "Done"),
        json!([
            {
                "created": "2024-01-04T12:00:00.000+0000",
                "items": [{ "field": "status", "fromString": "In Progress", "toString": "Done" }]
            },
            {
                "created": "2024-01-03T00:00:00.000+0000",
                "items": [{ "field": "status", "fromString": "Open", "toString": "In Progress" }]
            }
        ]),
    )
}
