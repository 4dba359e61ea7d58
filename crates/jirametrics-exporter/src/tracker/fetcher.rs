use jirametrics_core::error::Result;
use jirametrics_core::tracker::Issue;

use super::TrackerApi;

/// Page through the issue search until the tracker returns an empty page.
///
/// The offset advances by the size of each page, so the server's page size is
/// honored whatever it is. Any failing page aborts the whole fetch and the
/// pages gathered so far are dropped.
pub async fn fetch_all_issues(tracker: &dyn TrackerApi, jql: &str) -> Result<Vec<Issue>> {
    let mut issues = Vec::new();
    let mut start_at = 0;

    loop {
        let page = tracker.search_page(jql, start_at).await?;
        tracing::debug!(start_at, page_len = page.len(), "fetched issue page");
        if page.is_empty() {
            break;
        }
        start_at += page.len();
        issues.extend(page);
    }

    Ok(issues)
}
