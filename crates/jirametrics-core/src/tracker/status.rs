use std::collections::HashMap;

use serde::Deserialize;

use super::issue::Named;
use crate::error::{ExporterError, Result};

/// One entry of `GET /rest/api/3/status`.
#[derive(Debug, Clone, Deserialize)]
pub struct TrackerStatus {
    pub name: String,
    #[serde(rename = "statusCategory", default)]
    pub status_category: Named,
}

/// Status name -> status category name, tracker-wide.
///
/// Rebuilt every refresh cycle; never mutated after construction.
#[derive(Debug, Clone, Default)]
pub struct StatusCatalog {
    categories: HashMap<String, String>,
}

impl StatusCatalog {
    /// Build the catalog. When two statuses share a name, the later one wins.
    pub fn from_statuses<I>(statuses: I) -> Self
    where
        I: IntoIterator<Item = TrackerStatus>,
    {
        let mut categories = HashMap::new();
        for s in statuses {
            if let Some(prev) = categories.insert(s.name.clone(), s.status_category.name.clone()) {
                if prev != s.status_category.name {
                    tracing::debug!(
                        status = %s.name,
                        previous = %prev,
                        category = %s.status_category.name,
                        "duplicate status name with different category"
                    );
                }
            }
        }
        Self { categories }
    }

    pub fn category(&self, status: &str) -> Option<&str> {
        self.categories.get(status).map(String::as_str)
    }

    /// Category for a status referenced by `issue`'s history.
    pub fn require_category(&self, issue: &str, status: &str) -> Result<&str> {
        self.category(status).ok_or_else(|| ExporterError::UnknownStatus {
            issue: issue.to_string(),
            status: status.to_string(),
        })
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

impl FromIterator<(String, String)> for StatusCatalog {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self {
            categories: iter.into_iter().collect(),
        }
    }
}
