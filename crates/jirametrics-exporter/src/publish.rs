//! Issue facts -> labeled series.

use jirametrics_core::durations::status_durations;
use jirametrics_core::error::Result;
use jirametrics_core::tracker::{Issue, StatusCatalog};

use crate::obs::IssueMetrics;

/// Publish every issue into `sink`, stopping at the first failure.
pub fn publish_issues(sink: &IssueMetrics, catalog: &StatusCatalog, issues: &[Issue]) -> Result<()> {
    for issue in issues {
        publish_issue(sink, catalog, issue)?;
    }
    Ok(())
}

/// Count the issue once under its current status, then observe the hours it
/// spent in every status it has left.
///
/// Categories for all of the issue's statuses are resolved before the first
/// observation, so an unknown status leaves no partial durations behind.
pub fn publish_issue(sink: &IssueMetrics, catalog: &StatusCatalog, issue: &Issue) -> Result<()> {
    let project = issue.project_key();
    let priority = issue.priority_name();
    let assignee = issue.assignee_id();
    let issue_type = issue.issue_type_name();

    sink.issue_count.inc(&[
        ("project", project),
        ("priority", priority),
        ("status", issue.status_name()),
        ("statusCategory", issue.status_category_name()),
        ("assignee", assignee),
        ("issueType", issue_type),
    ]);

    let durations = status_durations(issue)?;
    let facts = durations
        .iter()
        .map(|(status, hours)| {
            let category = catalog.require_category(&issue.key, status)?;
            Ok((status.as_str(), category, *hours))
        })
        .collect::<Result<Vec<_>>>()?;

    for (status, category, hours) in facts {
        sink.time_in_status.observe(
            &[
                ("project", project),
                ("priority", priority),
                ("assignee", assignee),
                ("issueType", issue_type),
                ("status", status),
                ("statusCategory", category),
            ],
            hours,
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::tracker::fake::{finished_issue, issue_with_history, plain_issue};
    use jirametrics_core::error::ErrorKind;

    fn catalog() -> StatusCatalog {
        [
            ("Open", "To Do"),
            ("In Progress", "In Progress"),
            ("Done", "Done"),
        ]
        .into_iter()
        .map(|(s, c)| (s.to_string(), c.to_string()))
        .collect()
    }

    fn duration_labels<'a>(status: &'a str, category: &'a str) -> [(&'a str, &'a str); 6] {
        [
            ("project", "OPS"),
            ("priority", "Medium"),
            ("assignee", "dev@example.com"),
            ("issueType", "Task"),
            ("status", status),
            ("statusCategory", category),
        ]
    }

    #[test]
    fn end_to_end_scenario() {
        let sink = IssueMetrics::new();
        publish_issue(&sink, &catalog(), &finished_issue("OPS-1")).unwrap();

        let count = sink.issue_count.get(&[
            ("project", "OPS"),
            ("priority", "Medium"),
            ("status", "Done"),
            ("statusCategory", "Done"),
            ("assignee", "dev@example.com"),
            ("issueType", "Task"),
        ]);
        assert_eq!(count, Some(1));

        let open = sink.time_in_status.snapshot(&duration_labels("Open", "To Do")).unwrap();
        assert_eq!(open.sum, 48.0);
        assert_eq!(open.count, 1);
        let progress = sink
            .time_in_status
            .snapshot(&duration_labels("In Progress", "In Progress"))
            .unwrap();
        assert_eq!(progress.sum, 36.0);
        assert!(sink.time_in_status.snapshot(&duration_labels("Done", "Done")).is_none());
        assert_eq!(sink.time_in_status.len(), 2);
    }

    #[test]
    fn issue_without_history_is_counted_once() {
        let sink = IssueMetrics::new();
        publish_issue(&sink, &catalog(), &plain_issue("OPS-2")).unwrap();

        assert_eq!(sink.issue_count.len(), 1);
        assert!(sink.time_in_status.is_empty());
    }

    #[test]
    fn same_labels_accumulate_across_issues() {
        let sink = IssueMetrics::new();
        let issues = vec![finished_issue("OPS-1"), finished_issue("OPS-2")];
        publish_issues(&sink, &catalog(), &issues).unwrap();

        let open = sink.time_in_status.snapshot(&duration_labels("Open", "To Do")).unwrap();
        assert_eq!(open.count, 2);
        assert_eq!(open.sum, 96.0);
        assert_eq!(sink.issue_count.len(), 1);
    }

    #[test]
    fn unknown_status_publishes_no_partial_durations() {
        let issue = issue_with_history(
            "OPS-3",
            "2024-01-01T00:00:00.000+0000",
            ("Done", "Done"),
            json!([
                {
                    "created": "2024-01-03T00:00:00.000+0000",
                    "items": [{ "field": "status", "fromString": "Blocked" }]
                },
                {
                    "created": "2024-01-02T00:00:00.000+0000",
                    "items": [{ "field": "status", "fromString": "Open" }]
                }
            ]),
        );

        let sink = IssueMetrics::new();
        let err = publish_issue(&sink, &catalog(), &issue).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownStatus);
        assert!(err.to_string().contains("Blocked"), "got: {err}");
        assert!(sink.time_in_status.is_empty());
    }

    #[test]
    fn first_failure_stops_the_batch() {
        let bad = issue_with_history(
            "OPS-4",
            "not a timestamp",
            ("Open", "To Do"),
            json!([]),
        );
        let issues = vec![finished_issue("OPS-1"), bad, finished_issue("OPS-5")];

        let sink = IssueMetrics::new();
        let err = publish_issues(&sink, &catalog(), &issues).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TimestampParse);

        let open = sink.time_in_status.snapshot(&duration_labels("Open", "To Do")).unwrap();
        assert_eq!(open.count, 1);
    }
}
