use jirametrics_core::error::Result;
use jirametrics_core::tracker::StatusCatalog;

use super::TrackerApi;

/// Fetch every workflow status and index it by name.
pub async fn build_status_catalog(tracker: &dyn TrackerApi) -> Result<StatusCatalog> {
    let statuses = tracker.statuses().await?;
    let catalog = StatusCatalog::from_statuses(statuses);
    tracing::debug!(statuses = catalog.len(), "status catalog built");
    Ok(catalog)
}
