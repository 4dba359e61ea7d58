use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use jirametrics_core::error::{ExporterError, Result};
use jirametrics_core::tracker::{Issue, SearchPage, TrackerStatus};

use crate::config::JiraSection;

/// Fields requested per issue. Everything the metric labels need, nothing more.
pub const SEARCH_FIELDS: &str = "created,status,assignee,priority,project,issuetype";

/// Longest response body quoted in a fetch error.
const ERROR_BODY_LIMIT: usize = 512;

/// The tracker calls a refresh cycle needs.
#[async_trait]
pub trait TrackerApi: Send + Sync {
    /// Every workflow status, tracker-wide.
    async fn statuses(&self) -> Result<Vec<TrackerStatus>>;
    /// One page of issues matching `jql`, with changelog, starting at `start_at`.
    async fn search_page(&self, jql: &str, start_at: usize) -> Result<Vec<Issue>>;
    /// The authenticated user; used as a readiness probe.
    async fn myself(&self) -> Result<Myself>;
}

/// `GET /rest/api/3/myself`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Myself {
    #[serde(default)]
    pub email_address: Option<String>,
    #[serde(default)]
    pub active: bool,
}

/// Jira Cloud REST v3 over HTTP basic auth.
#[derive(Clone)]
pub struct JiraClient {
    client: Client,
    base_url: String,
    user: String,
    api_token: String,
}

impl JiraClient {
    /// Every request carries `jira.request_timeout_secs` as its own deadline.
    pub fn new(cfg: &JiraSection) -> Result<Self> {
        let client = Client::builder()
            .timeout(cfg.request_timeout())
            .build()
            .map_err(|e| ExporterError::Config(format!("http client build failed: {e}")))?;
        Ok(Self {
            client,
            base_url: cfg.base_url().to_string(),
            user: cfg.user.clone(),
            api_token: cfg.api_token.clone(),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, "tracker request");

        let response = self
            .client
            .get(&url)
            .basic_auth(&self.user, Some(&self.api_token))
            .query(query)
            .send()
            .await
            .map_err(|e| transport_error(path, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let body: String = body.chars().take(ERROR_BODY_LIMIT).collect();
            return Err(ExporterError::Fetch(format!("GET {path}: HTTP {status}: {body}")));
        }

        let bytes = response.bytes().await.map_err(|e| transport_error(path, e))?;
        serde_json::from_slice(&bytes)
            .map_err(|e| ExporterError::Decode(format!("GET {path}: {e}")))
    }
}

fn transport_error(path: &str, e: reqwest::Error) -> ExporterError {
    if e.is_timeout() {
        ExporterError::Fetch(format!("GET {path}: timed out"))
    } else {
        ExporterError::Fetch(format!("GET {path}: {e}"))
    }
}

#[async_trait]
impl TrackerApi for JiraClient {
    async fn statuses(&self) -> Result<Vec<TrackerStatus>> {
        self.get_json("/rest/api/3/status", &[]).await
    }

    async fn search_page(&self, jql: &str, start_at: usize) -> Result<Vec<Issue>> {
        let query = [
            ("expand", "changelog".to_string()),
            ("fields", SEARCH_FIELDS.to_string()),
            ("startAt", start_at.to_string()),
            ("jql", jql.to_string()),
        ];
        let page: SearchPage = self.get_json("/rest/api/3/search", &query).await?;
        Ok(page.issues)
    }

    async fn myself(&self) -> Result<Myself> {
        self.get_json("/rest/api/3/myself", &[]).await
    }
}
